/// Identifier fragment marking a chatroom id
pub const ROOM_ID_MARK: &str = "@chatroom";

/// Identifier fragment marking an official (subscription) account
pub const OFFICIAL_ACCOUNT_MARK: &str = "gh_";

/// Identifier fragment marking an enterprise contact
pub const ENTERPRISE_ID_MARK: &str = "@openim";

/// Display name used when the native table carries none
pub const FALLBACK_NAME: &str = "Unknown";
