//! Control flow for the executor.

use std::rc::Rc;

use crate::code::Code;

/// What the frame loop does after a token has been handled.
#[derive(Debug)]
pub(crate) enum Flow {
    /// Continue with the following token
    Next,
    /// Continue at this position of the current frame
    Jump(usize),
    /// Run a nest in a new frame, then come back
    Call(Rc<Code>),
    /// Restart the current frame from its first token
    Rewind,
}
