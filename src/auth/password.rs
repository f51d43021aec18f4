/// Mock credentials are stored in plaintext; a match is exact string equality.
pub fn verify_password(password: &str, stored: &str) -> bool {
    password == stored
}
