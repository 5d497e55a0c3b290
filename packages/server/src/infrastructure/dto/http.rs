//! HTTP snapshot API DTOs.

use serde::Serialize;

/// One entry of `GET /class/{class_id}/users`.
///
/// `id` is the position in the sorted user list, rebuilt per request.
#[derive(Debug, Serialize)]
pub struct ClassUserDto {
    pub id: usize,
    pub username: String,
}
