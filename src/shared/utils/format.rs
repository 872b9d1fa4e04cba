use chrono::Utc;

/// Human readable size shown on attachment cards, always in KB
pub fn format_file_size(bytes: usize) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Client session token, `session_<unix millis>_<8 hex chars>`
pub fn generate_session_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", Utc::now().timestamp_millis(), &suffix[..8])
}

/// File name used for images pasted from the clipboard
pub fn pasted_image_name() -> String {
    format!("pasted-image-{}.png", Utc::now().timestamp_millis())
}
