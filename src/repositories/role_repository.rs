use sea_orm::*;
use crate::entities::{role, role::Entity as Role, user};

pub struct RoleRepository;

impl RoleRepository {
    pub async fn all<C: ConnectionTrait>(db: &C) -> Result<Vec<role::Model>, DbErr> {
        Role::find().order_by_asc(role::Column::Id).all(db).await
    }

    pub async fn find_by_name<C: ConnectionTrait>(
        db: &C,
        name: &str,
    ) -> Result<Option<role::Model>, DbErr> {
        Role::find()
            .filter(role::Column::Name.eq(name))
            .one(db)
            .await
    }

    // Roles currently linked to a user through user_roles
    pub async fn for_user<C: ConnectionTrait>(
        db: &C,
        user: &user::Model,
    ) -> Result<Vec<role::Model>, DbErr> {
        user.find_related(Role).all(db).await
    }
}
