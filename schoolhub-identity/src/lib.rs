//! # SchoolHub Identity
//!
//! Roles and signed-in session types shared by the SchoolHub crates.
//!
//! ## Overview
//!
//! - **Roles**: the three authorization classes of a school user
//!   (`admin`, `teacher`, `student`)
//! - **Sessions**: the authenticated user as seen by the rest of the app
//!   (`id`, `name`, `role`) and the provider trait that supplies it
//!
//! Authentication itself happens elsewhere. Everything in this crate only
//! reads who is signed in.
//!
//! ## Usage
//!
//! ```rust
//! use schoolhub_identity::{Role, SessionProvider, SessionUser, StaticSession};
//!
//! let session = StaticSession::signed_in(SessionUser::new("Ms. Okafor", Role::Teacher));
//! let user = session.current_user().unwrap();
//! assert_eq!(user.role, Role::Teacher);
//! assert!(!user.role.is_admin());
//! ```

pub mod roles;
pub mod session;

// Re-export main types for convenience
pub use roles::Role;
pub use session::{SessionProvider, SessionUser, StaticSession};
