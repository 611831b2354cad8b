//! Staff service.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use schooldesk_common::{AppError, AppResult, id::IdGenerator};
use schooldesk_db::entities::staff::{self, RecordStatus, StaffRole};
use schooldesk_db::relations::DeleteSummary;
use schooldesk_db::repositories::StaffRepository;
use sea_orm::{ActiveValue::NotSet, Set};
use serde::Deserialize;
use validator::Validate;

use super::non_negative;

/// Named staff lists. Each one is an exact role match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffFilter {
    Teachers,
    Admin,
    Support,
    #[default]
    All,
}

impl StaffFilter {
    /// Role selected by this filter, `None` for everyone.
    #[must_use]
    pub const fn role(self) -> Option<StaffRole> {
        match self {
            Self::Teachers => Some(StaffRole::Teacher),
            Self::Admin => Some(StaffRole::Admin),
            Self::Support => Some(StaffRole::Support),
            Self::All => None,
        }
    }
}

impl FromStr for StaffFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teachers" => Ok(Self::Teachers),
            "admin" => Ok(Self::Admin),
            "support" => Ok(Self::Support),
            "" | "all" => Ok(Self::All),
            other => Err(AppError::BadRequest(format!("Unknown staff filter: {other}"))),
        }
    }
}

/// Input for creating a staff member.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStaffInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Assigned from the `STF-` sequence when absent.
    #[validate(length(min = 1, max = 20))]
    pub staff_id: Option<String>,
    #[serde(default)]
    pub role: StaffRole,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 15))]
    pub phone: Option<String>,
    #[validate(length(max = 2048))]
    pub address: Option<String>,
    /// Defaults to today.
    pub date_joined: Option<NaiveDate>,
    #[validate(custom(function = "non_negative"))]
    pub salary: Option<Decimal>,
    #[serde(default)]
    pub status: RecordStatus,
    #[validate(length(max = 4096))]
    pub qualifications: Option<String>,
    #[validate(length(max = 200))]
    pub subjects: Option<String>,
}

/// Input for updating a staff member.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateStaffInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub role: Option<StaffRole>,
    #[validate(length(max = 100))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub department: Option<Option<String>>,
    #[validate(email)]
    #[serde(default, deserialize_with = "super::nullable")]
    pub email: Option<Option<String>>,
    #[validate(length(max = 15))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub phone: Option<Option<String>>,
    #[validate(length(max = 2048))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub address: Option<Option<String>>,
    pub date_joined: Option<NaiveDate>,
    #[validate(custom(function = "non_negative"))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub salary: Option<Option<Decimal>>,
    pub status: Option<RecordStatus>,
    #[validate(length(max = 4096))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub qualifications: Option<Option<String>>,
    #[validate(length(max = 200))]
    #[serde(default, deserialize_with = "super::nullable")]
    pub subjects: Option<Option<String>>,
}

/// Service for managing staff members.
#[derive(Clone)]
pub struct StaffService {
    staff_repo: StaffRepository,
    id_gen: IdGenerator,
}

impl StaffService {
    /// Create a new staff service.
    #[must_use]
    pub const fn new(staff_repo: StaffRepository) -> Self {
        Self {
            staff_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a staff member by ID.
    pub async fn get(&self, id: &str) -> AppResult<staff::Model> {
        self.staff_repo.get_by_id(id).await
    }

    /// List all staff ordered by name.
    pub async fn list(&self) -> AppResult<Vec<staff::Model>> {
        self.staff_repo.find_all().await
    }

    /// Case-insensitive search over name and role.
    pub async fn search(&self, query: &str) -> AppResult<Vec<staff::Model>> {
        self.staff_repo.search(query).await
    }

    /// Staff matching a named filter.
    pub async fn filter(&self, filter: StaffFilter) -> AppResult<Vec<staff::Model>> {
        match filter.role() {
            Some(role) => self.staff_repo.find_by_role(role).await,
            None => self.staff_repo.find_all().await,
        }
    }

    /// Create a staff member.
    pub async fn create(&self, input: CreateStaffInput) -> AppResult<staff::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let now = Utc::now();
        let model = staff::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            staff_id: input.staff_id.map_or(NotSet, Set),
            role: Set(input.role),
            department: Set(input.department),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            date_joined: Set(input.date_joined.unwrap_or_else(|| now.date_naive())),
            salary: Set(input.salary),
            status: Set(input.status),
            qualifications: Set(input.qualifications),
            subjects: Set(input.subjects),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        self.staff_repo.create(model).await
    }

    /// Update a staff member.
    pub async fn update(&self, id: &str, input: UpdateStaffInput) -> AppResult<staff::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let member = self.staff_repo.get_by_id(id).await?;
        let mut active: staff::ActiveModel = member.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(role) = input.role {
            active.role = Set(role);
        }
        if let Some(department) = input.department {
            active.department = Set(department);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(date_joined) = input.date_joined {
            active.date_joined = Set(date_joined);
        }
        if let Some(salary) = input.salary {
            active.salary = Set(salary);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(qualifications) = input.qualifications {
            active.qualifications = Set(qualifications);
        }
        if let Some(subjects) = input.subjects {
            active.subjects = Set(subjects);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.staff_repo.update(active).await
    }

    /// Delete a staff member. Records they created or run are kept and detached.
    pub async fn delete(&self, id: &str) -> AppResult<DeleteSummary> {
        self.staff_repo.delete(id).await
    }
}
