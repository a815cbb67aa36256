//! Route groups by access level
//!
//! Every domain crate hands its routes to the API binary split by the access
//! they need. The binary applies the auth guard once per group, so handlers
//! never repeat role checks.

use axum::Router;

#[derive(Default)]
pub struct RouteGroups {
    /// No token required
    pub public: Router,
    /// Any signed-in user
    pub member: Router,
    /// Admins only
    pub admin: Router,
}

impl RouteGroups {
    pub fn new(public: Router, member: Router, admin: Router) -> Self {
        Self {
            public,
            member,
            admin,
        }
    }

    /// Combine the groups of two crates, group by group
    pub fn merge(self, other: RouteGroups) -> Self {
        Self {
            public: self.public.merge(other.public),
            member: self.member.merge(other.member),
            admin: self.admin.merge(other.admin),
        }
    }
}
