use uuid::Uuid;

/// Build an opaque resource id such as `users-3f9c0a1b2d4e5f60`.
pub fn new_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &suffix[..16])
}
