pub mod admin_repository;
pub mod category_repository;
pub mod class_iteration_repository;
pub mod event_repository;
pub mod member_repository;
pub mod newsletter_repository;
pub mod program_repository;
pub mod registration_repository;
pub mod repository_factory;

pub use admin_repository::SeaOrmAdminRepository;
pub use category_repository::SeaOrmCategoryRepository;
pub use class_iteration_repository::SeaOrmClassIterationRepository;
pub use event_repository::SeaOrmEventRepository;
pub use member_repository::SeaOrmMemberRepository;
pub use newsletter_repository::SeaOrmNewsletterRepository;
pub use program_repository::SeaOrmProgramRepository;
pub use registration_repository::SeaOrmRegistrationRepository;
pub use repository_factory::SeaOrmRepositoryFactory;
