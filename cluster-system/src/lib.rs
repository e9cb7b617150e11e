pub mod error;
pub mod ext;
pub mod member;
pub mod member_result;
pub mod membership;
pub mod rank;

pub use error::{Error, Result};
pub use member::{Member, MemberState};
pub use member_result::{MemberResult, MemberResults};
pub use membership::Membership;
pub use rank::Rank;

#[cfg(test)]
mod system_test {
    use tracing::Level;

    use crate::ext::init_logger;

    #[ctor::ctor]
    fn init() {
        init_logger(Level::DEBUG)
    }
}
