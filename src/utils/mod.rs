mod models;

pub(crate) use self::models::sync;
