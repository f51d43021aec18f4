use crate::model::{attendance::Attendance, role::Role, user::User};
use chrono::{NaiveDate, NaiveTime};

fn user(id: u64, username: &str, password: &str, email: &str, manager_id: Option<u64>) -> User {
    User {
        id,
        username: username.to_string(),
        password: password.to_string(),
        email: email.to_string(),
        role: if manager_id.is_some() {
            Role::Employee
        } else {
            Role::Manager
        },
        manager_id,
    }
}

pub fn users() -> Vec<User> {
    vec![
        user(1, "john_doe", "password123", "john@company.com", Some(5)),
        user(2, "jane_smith", "password123", "jane@company.com", Some(5)),
        user(3, "bob_wilson", "password123", "bob@company.com", Some(6)),
        user(4, "alice_brown", "password123", "alice@company.com", Some(6)),
        user(5, "manager_smith", "manager123", "smith@company.com", None),
        user(6, "manager_jones", "manager123", "jones@company.com", None),
    ]
}

struct Row {
    id: u64,
    user_id: u64,
    date: (i32, u32, u32),
    check_in: (u32, u32),
    check_out: (u32, u32),
    status: &'static str,
    remark: Option<&'static str>,
    review: Option<(bool, Option<u64>, Option<&'static str>)>,
}

fn clock((h, m): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("seed time is a wall-clock time")
}

impl From<Row> for Attendance {
    fn from(row: Row) -> Self {
        let (y, m, d) = row.date;
        let (verified, verified_by, note) = match row.review {
            Some((v, by, note)) => (Some(v), by, note.map(str::to_string)),
            None => (None, None, None),
        };
        Attendance {
            id: row.id,
            user_id: row.user_id,
            date: NaiveDate::from_ymd_opt(y, m, d).expect("seed date is a calendar date"),
            check_in: Some(clock(row.check_in)),
            check_out: Some(clock(row.check_out)),
            status: row.status.to_string(),
            remark: row.remark.map(str::to_string),
            remark_verified: verified,
            verified_by,
            manager_note: note,
        }
    }
}

pub fn attendance() -> Vec<Attendance> {
    [
        Row {
            id: 1,
            user_id: 1,
            date: (2025, 12, 5),
            check_in: (9, 15),
            check_out: (17, 30),
            status: "late",
            remark: Some("Traffic jam on highway"),
            review: Some((false, None, None)),
        },
        Row {
            id: 2,
            user_id: 1,
            date: (2025, 12, 4),
            check_in: (9, 0),
            check_out: (17, 0),
            status: "on_time",
            remark: None,
            review: None,
        },
        Row {
            id: 3,
            user_id: 1,
            date: (2025, 12, 3),
            check_in: (8, 55),
            check_out: (16, 45),
            status: "early_leave",
            remark: Some("Doctor appointment"),
            review: Some((true, Some(5), Some("Acceptable reason"))),
        },
        Row {
            id: 4,
            user_id: 2,
            date: (2025, 12, 5),
            check_in: (8, 45),
            check_out: (17, 15),
            status: "on_time",
            remark: None,
            review: None,
        },
        Row {
            id: 5,
            user_id: 2,
            date: (2025, 12, 4),
            check_in: (9, 30),
            check_out: (17, 0),
            status: "late",
            remark: Some("Child was sick, had to take to hospital"),
            review: Some((false, None, None)),
        },
        Row {
            id: 6,
            user_id: 3,
            date: (2025, 12, 5),
            check_in: (9, 0),
            check_out: (17, 0),
            status: "on_time",
            remark: None,
            review: None,
        },
        Row {
            id: 7,
            user_id: 4,
            date: (2025, 12, 5),
            check_in: (9, 10),
            check_out: (17, 0),
            status: "late",
            remark: Some("Train delay due to signal problem"),
            review: Some((true, Some(6), Some("Valid reason - public transport issue"))),
        },
    ]
    .into_iter()
    .map(Attendance::from)
    .collect()
}
