//! Repository traits

mod repositories;

pub use repositories::{
    CrudRepository, ItemRepository, MemberRepository, MemberRepositoryCustom, PagingRepository,
    QueryByExampleExecutor, RepoResult, SpecificationExecutor, TeamRepository,
};
