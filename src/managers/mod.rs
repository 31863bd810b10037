// LinkStash state managers
// Managers handle stateful operations over the owner's bookmark collection.

pub mod collection;
