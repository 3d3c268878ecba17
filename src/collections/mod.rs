mod view;

mod map;
pub use map::DisjointRangeMap;

mod algebra;

mod set;
pub use set::DisjointRangeSet;
