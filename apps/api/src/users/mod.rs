//! Profile and subscription endpoints. These stay reachable after the
//! trial expires so the user can still see their status and upgrade.

pub mod handlers;
