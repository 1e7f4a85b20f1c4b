//! Admin allow-list for the `/clear` command.
//!
//! The list is read from the `TELEGRAM_ADMIN_UID` environment variable as a
//! comma-separated list of Telegram user ids. Malformed items are skipped.
//! An empty or unset list disables the gate entirely, so a ledger without
//! configured admins lets anyone clear it.

/// Loads the admin allow-list from `TELEGRAM_ADMIN_UID`.
#[must_use]
pub fn admin_ids() -> Vec<i64> {
    std::env::var("TELEGRAM_ADMIN_UID")
        .map(|raw| parse_admin_list(&raw))
        .unwrap_or_default()
}

/// Parses a comma-separated id list, skipping blanks and malformed items.
#[must_use]
pub fn parse_admin_list(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|item| {
            let item = item.trim();
            if item.is_empty() {
                return None;
            }
            item.parse::<i64>().ok()
        })
        .collect()
}

/// Checks whether `user_id` may run admin-gated commands.
///
/// An empty allow-list means the gate is disabled and every caller is
/// authorized.
#[must_use]
pub fn is_authorized(admins: &[i64], user_id: i64) -> bool {
    admins.is_empty() || admins.contains(&user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_list_basic() {
        assert_eq!(parse_admin_list("123,456"), vec![123, 456]);
    }

    #[test]
    fn test_parse_admin_list_skips_blanks_and_garbage() {
        assert_eq!(parse_admin_list(" 123 , ,abc, 456,"), vec![123, 456]);
    }

    #[test]
    fn test_parse_admin_list_empty() {
        assert_eq!(parse_admin_list(""), Vec::<i64>::new());
    }

    #[test]
    fn test_is_authorized_with_allow_list() {
        let admins = vec![1, 2];
        assert!(is_authorized(&admins, 1));
        assert!(!is_authorized(&admins, 3));
    }

    #[test]
    fn test_is_authorized_empty_list_allows_everyone() {
        assert!(is_authorized(&[], 42));
    }
}
