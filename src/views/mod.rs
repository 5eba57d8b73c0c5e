//! View models behind the record screens: filtering, paging, statistics,
//! single-field editing and the lineage tree.

pub mod areas;
pub mod detail;
pub mod edit;
pub mod hierarchy;
pub mod list;
pub mod pager;

pub use areas::{AreaListView, AreaStats};
pub use detail::{DetailSection, DetailView};
pub use edit::{EditModal, EditValue, Notice, NoticeKind};
pub use hierarchy::{build_hierarchy, ChiefNode, HeadmanNode, Hierarchy};
pub use list::{LeaderListView, LeaderStats};
pub use pager::{Pager, DEFAULT_PAGE_SIZE};
