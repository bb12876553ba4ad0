use serde::{Deserialize, Serialize};

use crate::ids::{EnrollmentId, ResultTypeId};

/// An overall outcome category (e.g. "passed", "failed").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultType {
    pub id: ResultTypeId,
    pub name: String,
}

/// The single overall result recorded for an enrollment, with its
/// result-type relation pre-loaded. Written by external result management;
/// this service only looks it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub enrollment_id: EnrollmentId,
    pub result_type: ResultType,
}
