//! Authorization gate.
//!
//! Operations never consult a global current user; the caller threads an
//! explicit [`User`] through, and the gate answers a single question:
//! may this user perform this action on this subject. Actions are a closed
//! enum, not free-form strings.

use skillsheet_types::course::{Course, Enrollment};
use skillsheet_types::user::User;

/// Capability granting result editing on enrollments.
pub const ENROLLMENTS_EDIT: &str = "enrollments.edit";

/// An action a user may attempt, together with its subject.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    /// View a course's skills, enrollments, and evaluations.
    ViewCourse(&'a Course),
    /// View one specific enrollment's skill sheet.
    ViewEnrollment(&'a Enrollment),
    /// Edit enrollment results.
    EditEnrollments,
}

/// Boolean authorization decision point.
///
/// The service consumes this trait so deployments can swap in a different
/// policy without touching the operations.
pub trait Gate: Send + Sync {
    fn allows(&self, user: &User, action: Action<'_>) -> bool;

    fn denies(&self, user: &User, action: Action<'_>) -> bool {
        !self.allows(user, action)
    }
}

/// Role-and-capability policy.
///
/// Admins are allowed everything. Teachers may view the courses they teach
/// (and the enrollments of those courses); editing enrollment results
/// additionally requires the `enrollments.edit` capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityGate;

impl Gate for CapabilityGate {
    fn allows(&self, user: &User, action: Action<'_>) -> bool {
        match action {
            Action::ViewCourse(course) => user.is_admin() || user.teaches(course.id),
            Action::ViewEnrollment(enrollment) => {
                user.is_admin() || user.teaches(enrollment.course_id)
            }
            Action::EditEnrollments => user.is_admin() || user.has_capability(ENROLLMENTS_EDIT),
        }
    }
}
