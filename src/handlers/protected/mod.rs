// handlers/protected/mod.rs - Handlers behind jwt_auth_middleware
//
// Every handler here receives the caller as `Extension<AuthUser>`. Handlers
// under /students/:user_id resolve the path id through
// `AppState::authorize_owner` before touching the store.
pub mod assessment;
pub mod education;
pub mod profile;
pub mod users;
