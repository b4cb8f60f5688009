//! # Ownership Authorizer
//!
//! One rule gates both edit and delete: admins may touch anything, everyone
//! else only what they created. Addresses are compared as exact strings, so
//! `::ffff:10.0.0.1` and `10.0.0.1` are different clients.

use domains::{AdminSet, Prompt};

pub fn is_admin(requester: &str, admins: &AdminSet) -> bool {
    admins.contains(requester)
}

pub fn can_edit(prompt: &Prompt, requester: &str, admins: &AdminSet) -> bool {
    is_admin(requester, admins) || requester == prompt.creator_ip
}
