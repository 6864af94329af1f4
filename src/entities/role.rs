use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip_serializing)]
    pub id: i64,
    pub public_id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRole,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role::Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_role::Relation::Role.def().rev())
    }
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRole.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// The closed set of roles the application knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleName {
    Customer,
    Employee,
    Admin,
    Company,
}

impl RoleName {
    /// Creation order used by the role seeder.
    pub const ALL: [RoleName; 4] = [
        RoleName::Customer,
        RoleName::Employee,
        RoleName::Admin,
        RoleName::Company,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoleName::Customer => "Customer",
            RoleName::Employee => "Employee",
            RoleName::Admin => "Admin",
            RoleName::Company => "Company",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RoleName::Customer => "Customer browsing and purchasing books",
            RoleName::Employee => "Staff member managing the catalogue",
            RoleName::Admin => "Administrator with full access",
            RoleName::Company => "Business customer with company terms",
        }
    }

    pub fn from_name(name: &str) -> Option<RoleName> {
        Self::ALL.into_iter().find(|role| role.as_str() == name)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_round_trip_through_from_name() {
        for role in RoleName::ALL {
            assert_eq!(RoleName::from_name(role.as_str()), Some(role));
        }
        assert_eq!(RoleName::from_name("admin"), None);
    }
}
