use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use forum_core::api::{AuthToken, NewSession, NewUser, User, UserId, Uuid};
use tokio::sync::RwLock;

use crate::Error;

/// Registered users and their open sessions. Lives only as long as the process.
#[derive(Clone)]
pub struct UserDb {
    bcrypt_cost: u32,
    db: Arc<RwLock<Users>>,
}

#[derive(Default)]
struct Users {
    users: HashMap<UserId, DbUser>,
    sessions: HashMap<AuthToken, UserId>,
}

struct DbUser {
    name: String,
    password_hash: String,
}

impl UserDb {
    pub fn new(bcrypt_cost: u32) -> UserDb {
        UserDb {
            bcrypt_cost,
            db: Arc::new(RwLock::new(Users::default())),
        }
    }

    pub async fn create_user(&self, u: NewUser) -> Result<UserId, Error> {
        let cost = self.bcrypt_cost;
        let password = u.password;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .context("joining password hashing task")?
            .context("hashing password")?;
        let mut db = self.db.write().await;
        if db.users.values().any(|existing| existing.name == u.name) {
            return Err(Error::name_already_used(u.name));
        }
        let id = UserId(Uuid::new_v4());
        db.users.insert(
            id,
            DbUser {
                name: u.name,
                password_hash,
            },
        );
        Ok(id)
    }

    /// Returns `None` on unknown user or wrong password.
    ///
    /// The password check runs with no lock held, so that sessions keep
    /// resolving while a login is being verified.
    pub async fn login_user(&self, s: &NewSession) -> anyhow::Result<Option<AuthToken>> {
        let (id, password_hash) = {
            let db = self.db.read().await;
            match db.users.iter().find(|(_, u)| u.name == s.user) {
                None => return Ok(None),
                Some((id, u)) => (*id, u.password_hash.clone()),
            }
        };
        let password = s.password.clone();
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .context("joining password verification task")?
            .with_context(|| format!("verifying password of user {id:?}"))?;
        if !valid {
            return Ok(None);
        }
        let token = AuthToken(Uuid::new_v4());
        self.db.write().await.sessions.insert(token, id);
        Ok(Some(token))
    }

    /// Returns `false` if there was no such session
    pub async fn logout_user(&self, token: &AuthToken) -> bool {
        self.db.write().await.sessions.remove(token).is_some()
    }

    pub async fn recover_session(&self, token: AuthToken) -> Result<UserId, Error> {
        self.db
            .read()
            .await
            .sessions
            .get(&token)
            .copied()
            .ok_or(Error::unauthenticated())
    }

    pub async fn user_by_name(&self, name: &str) -> Option<User> {
        self.db
            .read()
            .await
            .users
            .iter()
            .find(|(_, u)| u.name == name)
            .map(|(id, u)| User {
                id: *id,
                name: u.name.clone(),
            })
    }

    pub async fn fetch_users(&self) -> Vec<User> {
        let mut users = self
            .db
            .read()
            .await
            .users
            .iter()
            .map(|(id, u)| User {
                id: *id,
                name: u.name.clone(),
            })
            .collect::<Vec<_>>();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        users
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: String::from(name),
            password: format!("{name} password"),
        }
    }

    fn session(name: &str, password: &str) -> NewSession {
        NewSession {
            user: String::from(name),
            password: String::from(password),
        }
    }

    #[tokio::test]
    async fn sessions() {
        let db = UserDb::new(4);
        let alice = db.create_user(new_user("alice")).await.unwrap();
        assert!(matches!(
            db.create_user(new_user("alice")).await,
            Err(Error::Rejected(forum_core::api::Error::NameAlreadyUsed(_)))
        ));

        assert_eq!(db.login_user(&session("alice", "nope")).await.unwrap(), None);
        assert_eq!(db.login_user(&session("bob", "bob password")).await.unwrap(), None);
        let token = db
            .login_user(&session("alice", "alice password"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(db.recover_session(token).await.unwrap(), alice);

        assert!(db.logout_user(&token).await);
        assert!(!db.logout_user(&token).await);
        assert!(db.recover_session(token).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn sessions_resolve_during_a_login() {
        // costly enough that verifying takes far longer than a session lookup
        let db = UserDb::new(12);
        db.create_user(new_user("alice")).await.unwrap();
        let token = db
            .login_user(&session("alice", "alice password"))
            .await
            .unwrap()
            .unwrap();

        let login = tokio::spawn({
            let db = db.clone();
            async move { db.login_user(&session("alice", "alice password")).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let user = tokio::time::timeout(Duration::from_millis(100), db.recover_session(token))
            .await
            .expect("session lookup waited behind a login");
        assert!(user.is_ok());
        assert!(!login.is_finished(), "login finished too early to overlap");
        assert!(login.await.unwrap().unwrap().is_some());
    }
}
