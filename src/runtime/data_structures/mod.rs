/// The integer cell stack, used for both the data and the return stacks.
pub mod stack;

/// The dictionary module provides the core interpreter word dictionary, with shadowing and
/// forgetting of words.
pub mod dictionary;

/// Named variables and the cells they address.
pub mod variables;
