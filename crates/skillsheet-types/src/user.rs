use serde::{Deserialize, Serialize};

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::ids::{CourseId, UserId};

/// An authenticated user, assembled by the API layer and threaded
/// explicitly into every operation.
///
/// Carries everything the authorization gate needs to decide: role, the
/// capability set, and the courses the user teaches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: UserRole,
    pub capabilities: HashSet<String>,
    pub course_ids: HashSet<CourseId>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether this user teaches the given course.
    pub fn teaches(&self, course_id: CourseId) -> bool {
        self.course_ids.contains(&course_id)
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}

/// User roles.
///
/// - Admin: full access to every course and enrollment
/// - Teacher: access limited to assigned courses plus granted capabilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Teacher,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Teacher => write!(f, "teacher"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "teacher" => Ok(UserRole::Teacher),
            other => Err(format!("invalid user role: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teacher() -> User {
        User {
            id: UserId(7),
            name: "Ms. Winter".to_string(),
            role: UserRole::Teacher,
            capabilities: HashSet::from(["enrollments.edit".to_string()]),
            course_ids: HashSet::from([CourseId(3)]),
        }
    }

    #[test]
    fn teaches_only_assigned_courses() {
        let user = teacher();
        assert!(user.teaches(CourseId(3)));
        assert!(!user.teaches(CourseId(4)));
    }

    #[test]
    fn capability_lookup() {
        let user = teacher();
        assert!(user.has_capability("enrollments.edit"));
        assert!(!user.has_capability("courses.delete"));
    }

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(UserRole::Teacher.to_string().parse::<UserRole>().unwrap(), UserRole::Teacher);
        assert!("principal".parse::<UserRole>().is_err());
    }
}
