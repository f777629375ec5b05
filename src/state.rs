use crate::{db::OrmConn, unit_of_work::UnitOfWork};

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
}

impl AppState {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }

    /// A fresh unit of work for one request.
    pub fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new(self.orm.clone())
    }
}
