use crate::model::{
    attendance::{Attendance, AttendanceWithEmployee},
    user::{EmployeeSummary, User},
};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

pub mod seed;

struct Tables {
    users: Vec<User>,
    attendance: Vec<Attendance>,
}

/// In-memory users and attendance tables.
///
/// Every read hands back a clone taken under the lock, so callers never
/// hold a live reference into the tables.
pub struct Store {
    tables: Mutex<Tables>,
}

/// Builds the store with the mock tables loaded.
pub fn init_db() -> Store {
    let store = Store::new(seed::users(), seed::attendance());
    debug!("Mock tables loaded");
    store
}

impl Store {
    pub fn new(users: Vec<User>, attendance: Vec<Attendance>) -> Self {
        Self {
            tables: Mutex::new(Tables { users, attendance }),
        }
    }

    // Writes are plain field assignments, so a poisoned table is still consistent.
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[allow(dead_code)]
    pub fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.lock().users.iter().find(|u| u.email == email).cloned()
    }

    pub fn find_user_by_id(&self, id: u64) -> Option<User> {
        self.lock().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn get_user_attendance(&self, user_id: u64, date: Option<&str>) -> Vec<Attendance> {
        self.lock()
            .attendance
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| date.is_none_or(|d| r.is_on(d)))
            .cloned()
            .collect()
    }

    /// Records of everyone reporting to `manager_id`, in table order.
    pub fn get_staff_attendance(
        &self,
        manager_id: u64,
        date: Option<&str>,
    ) -> Vec<AttendanceWithEmployee> {
        let tables = self.lock();

        let staff: HashSet<u64> = tables
            .users
            .iter()
            .filter(|u| u.manager_id == Some(manager_id))
            .map(|u| u.id)
            .collect();

        tables
            .attendance
            .iter()
            .filter(|r| staff.contains(&r.user_id))
            .filter(|r| date.is_none_or(|d| r.is_on(d)))
            .filter_map(|r| {
                let owner = tables.users.iter().find(|u| u.id == r.user_id)?;
                Some(AttendanceWithEmployee {
                    record: r.clone(),
                    employee: EmployeeSummary::from(owner),
                })
            })
            .collect()
    }

    pub fn find_attendance_by_id(&self, id: u64) -> Option<Attendance> {
        self.lock().attendance.iter().find(|r| r.id == id).cloned()
    }

    pub fn update_attendance_remark(&self, id: u64, remark: String) -> Option<Attendance> {
        let mut tables = self.lock();
        let record = tables.attendance.iter_mut().find(|r| r.id == id)?;
        record.set_remark(remark);
        Some(record.clone())
    }

    pub fn verify_attendance_remark(
        &self,
        id: u64,
        verified: bool,
        manager_id: u64,
        manager_note: Option<String>,
    ) -> Option<Attendance> {
        let mut tables = self.lock();
        let record = tables.attendance.iter_mut().find(|r| r.id == id)?;
        record.set_verification(verified, manager_id, manager_note);
        Some(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;
    use std::sync::Arc;
    use std::thread;

    fn ids(records: &[Attendance]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn user_lookups_return_first_match_or_none() {
        let store = init_db();
        assert_eq!(store.find_user_by_username("jane_smith").unwrap().id, 2);
        assert_eq!(store.find_user_by_email("smith@company.com").unwrap().id, 5);
        assert_eq!(store.find_user_by_id(6).unwrap().role, Role::Manager);
        assert!(store.find_user_by_email("nobody@company.com").is_none());
        assert!(store.find_user_by_id(42).is_none());
    }

    #[test]
    fn user_attendance_keeps_table_order_and_filters_by_date() {
        let store = init_db();
        assert_eq!(ids(&store.get_user_attendance(1, None)), vec![1, 2, 3]);
        assert_eq!(ids(&store.get_user_attendance(1, Some("2025-12-04"))), vec![2]);
        assert!(store.get_user_attendance(1, Some("2030-01-01")).is_empty());
        assert!(store.get_user_attendance(5, None).is_empty());
    }

    #[test]
    fn staff_attendance_covers_direct_reports_only() {
        let store = init_db();

        let rows = store.get_staff_attendance(5, None);
        let row_ids: Vec<u64> = rows.iter().map(|r| r.record.id).collect();
        assert_eq!(row_ids, vec![1, 2, 3, 4, 5]);
        assert!(rows.iter().all(|r| r.employee.id == r.record.user_id));
        assert_eq!(rows[3].employee.email, "jane@company.com");

        let rows = store.get_staff_attendance(6, Some("2025-12-05"));
        let row_ids: Vec<u64> = rows.iter().map(|r| r.record.id).collect();
        assert_eq!(row_ids, vec![6, 7]);

        // employees have no reports
        assert!(store.get_staff_attendance(1, None).is_empty());
    }

    #[test]
    fn remark_update_resets_verification() {
        let store = init_db();
        let updated = store
            .update_attendance_remark(3, "Changed my mind".into())
            .unwrap();
        assert_eq!(updated.remark.as_deref(), Some("Changed my mind"));
        assert_eq!(updated.remark_verified, Some(false));
        assert_eq!(updated.verified_by, None);
        assert_eq!(updated.manager_note, None);

        assert_eq!(store.find_attendance_by_id(3).unwrap(), updated);
        assert!(store.update_attendance_remark(99, "x".into()).is_none());
    }

    #[test]
    fn verification_records_manager_and_note() {
        let store = init_db();
        let verified = store
            .verify_attendance_remark(5, true, 5, Some("ok".into()))
            .unwrap();
        assert_eq!(verified.remark_verified, Some(true));
        assert_eq!(verified.verified_by, Some(5));
        assert_eq!(verified.manager_note.as_deref(), Some("ok"));
        assert!(store.verify_attendance_remark(99, true, 5, None).is_none());
    }

    #[test]
    fn returned_records_are_snapshots() {
        let store = init_db();
        let mut snapshot = store.find_attendance_by_id(2).unwrap();
        snapshot.remark = Some("local edit".into());
        assert_eq!(store.find_attendance_by_id(2).unwrap().remark, None);
    }

    #[test]
    fn concurrent_updates_are_serialized() {
        let store = Arc::new(init_db());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..50 {
                        store.update_attendance_remark(4, format!("remark {i}"));
                        store.verify_attendance_remark(4, true, 5, None);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let record = store.find_attendance_by_id(4).unwrap();
        assert!(record.remark.unwrap().starts_with("remark "));
        assert_eq!(record.verified_by, Some(5));
    }
}
