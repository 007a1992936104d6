//! Dormitory selection DTOs

use serde::Serialize;
use usersuite_core::models::{Division, Dormitory};

/// A division as shown with the dormitory selection
#[derive(Debug, Clone, Serialize)]
pub struct DivisionView {
    pub name: String,
    pub display_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_mail: Option<String>,
}

impl From<&Division> for DivisionView {
    fn from(division: &Division) -> Self {
        Self {
            name: division.name.clone(),
            display_name: division.display_name.clone(),
            support_mail: division.support_mail.clone(),
        }
    }
}

/// A dormitory selectable on the login page
#[derive(Debug, Clone, Serialize)]
pub struct DormitoryView {
    pub name: String,
    pub display_name: String,
    pub division: DivisionView,
}

impl From<&Dormitory> for DormitoryView {
    fn from(dormitory: &Dormitory) -> Self {
        Self {
            name: dormitory.name.clone(),
            display_name: dormitory.display_name.clone(),
            division: DivisionView::from(dormitory.division.as_ref()),
        }
    }
}
