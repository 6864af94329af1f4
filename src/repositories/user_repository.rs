use sea_orm::*;
use chrono::Utc;
use uuid::Uuid;
use crate::entities::{user, user::Entity as User, user_role};
use crate::models::account_model::NewAccount;

pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_normalized_email<C: ConnectionTrait>(
        db: &C,
        normalized_email: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(user::Column::NormalizedEmail.eq(normalized_email))
            .one(db)
            .await
    }

    // Returns every user clashing on email or user name so the caller can tell which one matched
    pub async fn find_duplicates<C: ConnectionTrait>(
        db: &C,
        normalized_user_name: &str,
        normalized_email: &str,
    ) -> Result<Vec<user::Model>, DbErr> {
        User::find()
            .filter(
                Condition::any()
                    .add(user::Column::NormalizedEmail.eq(normalized_email))
                    .add(user::Column::NormalizedUserName.eq(normalized_user_name)),
            )
            .all(db)
            .await
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        account: &NewAccount,
        password_hash: String,
    ) -> Result<user::Model, DbErr> {
        let now = Utc::now();
        let new_user = user::ActiveModel {
            id: NotSet,
            public_id: Set(Uuid::now_v7()),
            user_name: Set(account.user_name.clone()),
            normalized_user_name: Set(account.normalized_user_name.clone()),
            email: Set(account.email.clone()),
            normalized_email: Set(account.normalized_email.clone()),
            email_confirmed: Set(account.email_confirmed),
            password_hash: Set(password_hash),
            name: Set(account.name.clone()),
            phone_number: Set(account.phone_number.clone()),
            street_address: Set(account.street_address.clone()),
            city: Set(account.city.clone()),
            state: Set(account.state.clone()),
            postal_code: Set(account.postal_code.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_user.insert(db).await
    }

    pub async fn link_role<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        role_id: i64,
    ) -> Result<(), DbErr> {
        let link = user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        };
        user_role::Entity::insert(link).exec_without_returning(db).await?;
        Ok(())
    }
}
