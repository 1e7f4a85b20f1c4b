//! User business logic - idempotent registration and display names.
//!
//! Users are registered the first time they record an entry. Registration is
//! an insert-or-ignore keyed on the external Telegram id, so repeat calls
//! with the same id are no-ops and existing rows are never mutated.

use crate::{
    entities::user,
    errors::Result,
};
use sea_orm::{prelude::*, Set, sea_query::OnConflict};

/// Registers a user if not already known.
///
/// Conflicts on the primary key are ignored, making this safe to call on
/// every recorded entry.
pub async fn upsert_user(
    db: &DatabaseConnection,
    id: i64,
    username: Option<String>,
    first_name: String,
    last_name: Option<String>,
) -> Result<()> {
    let model = user::ActiveModel {
        id: Set(id),
        username: Set(username),
        first_name: Set(first_name),
        last_name: Set(last_name),
    };

    user::Entity::insert(model)
        .on_conflict(OnConflict::column(user::Column::Id).do_nothing().to_owned())
        .do_nothing()
        .exec(db)
        .await?;

    Ok(())
}

/// Display name for entry listings: username, then first name, then a
/// `user <id>` placeholder when the author row is missing or blank.
#[must_use]
pub fn display_name(author: Option<&user::Model>, user_id: i64) -> String {
    author
        .and_then(preferred_name)
        .unwrap_or_else(|| format!("user {user_id}"))
}

/// Display name for per-user summaries, defaulting to `"unknown"`.
#[must_use]
pub fn summary_name(author: Option<&user::Model>) -> String {
    author
        .and_then(preferred_name)
        .unwrap_or_else(|| "unknown".to_string())
}

fn preferred_name(author: &user::Model) -> Option<String> {
    if let Some(username) = &author.username {
        if !username.is_empty() {
            return Some(username.clone());
        }
    }
    if !author.first_name.is_empty() {
        return Some(author.first_name.clone());
    }
    None
}
