//! Actors that request state transitions.

/// The party on whose behalf a transition is executed.
///
/// Actors are optional everywhere in the executor: an absent actor means a
/// system-initiated transition and skips the permission check entirely.
///
/// # Example
///
/// ```rust
/// use stately::core::Actor;
///
/// struct Staff {
///     login: String,
///     admin: bool,
/// }
///
/// impl Actor for Staff {
///     fn id(&self) -> String {
///         self.login.clone()
///     }
///
///     fn is_privileged(&self) -> bool {
///         self.admin
///     }
/// }
///
/// let staff = Staff { login: "ada".to_string(), admin: true };
/// assert!(staff.is_privileged());
/// assert_eq!(staff.display_name(), "ada");
/// ```
pub trait Actor: Send + Sync {
    /// Stable identifier stored in audit entries.
    fn id(&self) -> String;

    /// Whether this actor passes the default permission check.
    fn is_privileged(&self) -> bool;

    /// Name used in error messages.
    ///
    /// Default implementation returns `id()`.
    fn display_name(&self) -> String {
        self.id()
    }
}
