use uuid::Uuid;

use crate::{Error, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn stub() -> UserId {
        UserId(STUB_UUID)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct NewUser {
    pub name: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.name)?;
        crate::validate_string(&self.password)?;
        let name_ok = !self.name.is_empty()
            && self
                .name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.');
        if !name_ok {
            return Err(Error::InvalidName(self.name.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: String::from(name),
            password: String::from("hunter2"),
        }
    }

    #[test]
    fn user_names() {
        assert_eq!(new_user("alice").validate(), Ok(()));
        assert_eq!(new_user("bob_the-2nd.").validate(), Ok(()));
        assert_eq!(
            new_user("").validate(),
            Err(Error::InvalidName(String::new()))
        );
        assert_eq!(
            new_user("a b").validate(),
            Err(Error::InvalidName(String::from("a b")))
        );
        assert_eq!(
            new_user("a\0b").validate(),
            Err(Error::NullByteInString(String::from("a\0b")))
        );
    }
}
