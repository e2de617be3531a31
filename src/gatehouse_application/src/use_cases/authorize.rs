use gatehouse_core::{Principal, SecuredOperation};

/// Decides whether a principal may perform a secured operation.
///
/// Stateless: the answer depends only on the two authority sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authorizer;

impl Authorizer {
    /// True iff `principal` holds at least one of the operation's required
    /// authorities. No principal is never authorized.
    pub fn authorize(&self, principal: Option<&Principal>, operation: &SecuredOperation) -> bool {
        principal.is_some_and(|p| p.authorities().intersects(operation.required()))
    }
}
