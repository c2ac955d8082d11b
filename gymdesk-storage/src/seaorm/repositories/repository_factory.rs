use async_trait::async_trait;

use gymdesk_interfaces::{
    AdminRepository, CategoryRepository, ClassIterationRepository, DatabaseError, EventRepository, MemberRepository,
    NewsletterRepository, ProgramRepository, RegistrationRepository, RepositoryFactory,
};

use super::*;
use crate::seaorm::connection::DatabaseConnection;

/// Every repository over one shared connection pool
#[derive(Clone)]
pub struct SeaOrmRepositoryFactory {
    db: DatabaseConnection,
    registrations: SeaOrmRegistrationRepository,
    newsletter: SeaOrmNewsletterRepository,
    members: SeaOrmMemberRepository,
    events: SeaOrmEventRepository,
    categories: SeaOrmCategoryRepository,
    programs: SeaOrmProgramRepository,
    class_iterations: SeaOrmClassIterationRepository,
    admins: SeaOrmAdminRepository,
}

impl SeaOrmRepositoryFactory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            registrations: SeaOrmRegistrationRepository::new(db.clone()),
            newsletter: SeaOrmNewsletterRepository::new(db.clone()),
            members: SeaOrmMemberRepository::new(db.clone()),
            events: SeaOrmEventRepository::new(db.clone()),
            categories: SeaOrmCategoryRepository::new(db.clone()),
            programs: SeaOrmProgramRepository::new(db.clone()),
            class_iterations: SeaOrmClassIterationRepository::new(db.clone()),
            admins: SeaOrmAdminRepository::new(db.clone()),
            db,
        }
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl RepositoryFactory for SeaOrmRepositoryFactory {
    fn registration_repository(&self) -> &dyn RegistrationRepository {
        &self.registrations
    }

    fn newsletter_repository(&self) -> &dyn NewsletterRepository {
        &self.newsletter
    }

    fn member_repository(&self) -> &dyn MemberRepository {
        &self.members
    }

    fn event_repository(&self) -> &dyn EventRepository {
        &self.events
    }

    fn category_repository(&self) -> &dyn CategoryRepository {
        &self.categories
    }

    fn program_repository(&self) -> &dyn ProgramRepository {
        &self.programs
    }

    fn class_iteration_repository(&self) -> &dyn ClassIterationRepository {
        &self.class_iterations
    }

    fn admin_repository(&self) -> &dyn AdminRepository {
        &self.admins
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.ping().await.map_err(DatabaseError::from)
    }
}
