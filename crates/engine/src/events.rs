//! UI events feeding the engine.
//!
//! The rendering layer normalizes DOM-ish interactions (clicks, input
//! changes) into these events; the engine turns them into intents.

/// Direction of a quantity stepper button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityStep {
    /// The `+` button.
    Increment,
    /// The `-` button.
    Decrement,
}

/// A user interaction with the cart UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// "Add to cart" on a product. Becomes `Create` when no cart is tracked
    /// yet, `Add` otherwise.
    AddToCart {
        /// Product variant ID.
        variant_id: String,
    },
    /// The trash button on a line.
    RemoveLine {
        /// Target line.
        line_id: String,
    },
    /// An increment/decrement button on a line. Dispatches immediately
    /// (no debounce), still subject to the busy drop.
    StepQuantity {
        /// Target line.
        line_id: String,
        /// Which button.
        step: QuantityStep,
        /// Whatever the adjacent quantity input currently displays. Used as
        /// the base value when it parses; otherwise the authoritative line
        /// quantity is used.
        input_value: Option<String>,
    },
    /// A keystroke in a line's free-text quantity input. Held for the
    /// quiescence window; a literal `0` dispatches a remove immediately.
    QuantityInput {
        /// Target line.
        line_id: String,
        /// Raw input contents after the keystroke.
        value: String,
    },
}
