use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::user::{NewUser as DomainNewUser, User as DomainUser},
    models::user::{NewUser as DbNewUser, User as DbUser},
    repository::{DieselRepository, UserReader, UserWriter},
};

impl UserReader for DieselRepository {
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email.to_lowercase()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &DomainNewUser) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let insertable = DbNewUser::from(new_user);

        let created = diesel::insert_into(users::table)
            .values(&insertable)
            .get_result::<DbUser>(&mut conn)?;

        Ok(created.into())
    }
}

/// Local account with the e-mail of `new_user`, inserted when missing.
pub(crate) fn get_or_create_user(
    conn: &mut SqliteConnection,
    new_user: &DomainNewUser,
) -> RepositoryResult<DbUser> {
    use crate::schema::users;

    let existing = users::table
        .filter(users::email.eq(new_user.email.to_lowercase()))
        .first::<DbUser>(conn)
        .optional()?;

    if let Some(user) = existing {
        return Ok(user);
    }

    log::info!("Creating local account for {}", new_user.email);
    let created = diesel::insert_into(users::table)
        .values(&DbNewUser::from(new_user))
        .get_result::<DbUser>(conn)?;

    Ok(created)
}
