/// Database access layer
///
/// Repository functions over a `PgPool` owned by the calling binary; the
/// pool is constructed once at startup (see the `db-pool` crate) and passed
/// down — no module-level connection state.
pub mod image_repo;
