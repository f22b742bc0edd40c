/// Tagged user identifier supplied by the boundary layer.
///
/// Callers resolve this once via `UserStore::resolve` and pass only the
/// resulting numeric id into the authorization services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    ById(i64),
    ByKey(String),
    ByPhone(String),
}

impl std::fmt::Display for UserLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserLookup::ById(id) => write!(f, "id:{}", id),
            UserLookup::ByKey(key) => write!(f, "key:{}", key),
            UserLookup::ByPhone(phone) => write!(f, "phone:{}", phone),
        }
    }
}
