use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::MemberRole;

/// A crew/team account inside one company.
///
/// Identity (who is behind the id) is resolved by the upstream identity
/// provider; this row only ties a resolved user id to a tenant and role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub company_id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: MemberRole,
    pub created_at: NaiveDateTime,
}
