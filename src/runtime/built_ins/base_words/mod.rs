/// Words that read or change the state of the machine itself, such as the radix.
pub mod machine_words;

/// Words that manipulate the data stack.
mod stack_words;

/// Words that move values to and from the return stack.
mod return_stack_words;

/// Integer arithmetic.
mod arithmetic_words;

/// Words that work with comparisons and bitwise logic.
mod math_logic_and_bit_words;

/// Words that work with words.
mod word_words;

/// Words that create new words and variables.
mod word_creation_words;

use crate::runtime::{
    built_ins::base_words::{
        arithmetic_words::register_arithmetic_words, machine_words::register_machine_words,
        math_logic_and_bit_words::register_math_logic_and_bit_words,
        return_stack_words::register_return_stack_words, stack_words::register_stack_words,
        word_creation_words::register_word_creation_words, word_words::register_word_words,
    },
    interpreter::Interpreter,
};

/// Called to register all of the core words of the language.
pub fn register_base_words(interpreter: &mut dyn Interpreter) {
    register_machine_words(interpreter);
    register_stack_words(interpreter);
    register_return_stack_words(interpreter);
    register_arithmetic_words(interpreter);
    register_math_logic_and_bit_words(interpreter);
    register_word_words(interpreter);
    register_word_creation_words(interpreter);
}
