pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn cookie(name: &str, value: &str, secure: bool) -> String {
    let secure_flag = if secure { " Secure;" } else { "" };
    format!("{name}={value}; HttpOnly; Max-Age=604800;{secure_flag} Path=/; SameSite=Strict")
}

/// An expired cookie, used to clear the session on logout.
pub fn clear_cookie(name: &str, secure: bool) -> String {
    let secure_flag = if secure { " Secure;" } else { "" };
    format!("{name}=; HttpOnly; Max-Age=0;{secure_flag} Path=/; SameSite=Strict")
}
