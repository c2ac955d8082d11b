pub mod admins;
pub mod category;
pub mod class_iteration;
pub mod events;
pub mod member;
pub mod member_program;
pub mod newsletter_subscribers;
pub mod program;
pub mod registrations;

pub use admins::{ActiveModel as AdminActiveModel, Column as AdminColumn, Entity as Admins, Model as AdminRow};
pub use category::{
    ActiveModel as CategoryActiveModel, Column as CategoryColumn, Entity as Categories, Model as CategoryRow,
};
pub use class_iteration::{
    ActiveModel as ClassIterationActiveModel, Column as ClassIterationColumn, Entity as ClassIterations,
    Model as ClassIterationRow,
};
pub use events::{ActiveModel as EventActiveModel, Column as EventColumn, Entity as Events, Model as EventRow};
pub use member::{ActiveModel as MemberActiveModel, Column as MemberColumn, Entity as Members, Model as MemberRow};
pub use member_program::{
    ActiveModel as MemberProgramActiveModel, Column as MemberProgramColumn, Entity as MemberPrograms,
    Model as MemberProgramRow,
};
pub use newsletter_subscribers::{
    ActiveModel as NewsletterSubscriberActiveModel, Column as NewsletterSubscriberColumn,
    Entity as NewsletterSubscribers, Model as NewsletterSubscriberRow,
};
pub use program::{ActiveModel as ProgramActiveModel, Column as ProgramColumn, Entity as Programs, Model as ProgramRow};
pub use registrations::{
    ActiveModel as RegistrationActiveModel, Column as RegistrationColumn, Entity as Registrations,
    Model as RegistrationRow,
};
