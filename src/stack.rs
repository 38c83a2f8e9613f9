//! The structural stack machine shared by the reader and the writer.
//!
//! Every structural transition — opening and closing containers, property
//! keys, separators, scalar values — is validated here before any state
//! changes. The machine is the single source of truth for nesting: it is
//! what rejects a bare scalar at the document root, a close without a
//! matching open, or a value where a comma or colon is still owed.

/// One open item on the structural stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Frame {
    /// An open object; `nonempty` once the first property key was seen.
    Object { nonempty: bool },
    /// An open array; `nonempty` once the first value was seen.
    Array { nonempty: bool },
    /// A property key was seen and its value is still owed.
    /// `colon` records whether the key/value separator has been consumed.
    Property { colon: bool },
}

impl Frame {
    fn name(&self) -> &'static str {
        match self {
            Frame::Object { .. } => "object",
            Frame::Array { .. } => "array",
            Frame::Property { .. } => "property value",
        }
    }
}

/// Where a freshly validated item lands, relative to its container.
///
/// The writer uses this to decide between "first item on a new line",
/// "comma, then a new line" and "value behind a property key".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Document root.
    Root,
    /// First item of a container.
    FirstValue,
    /// Later item of a container.
    NextValue,
    /// Value attached to a property key.
    PropertyValue,
}

/// A rejected transition, described but not yet located.
///
/// The reader attaches the input offset, the writer its output offset.
#[derive(Debug)]
pub(crate) struct Violation(pub(crate) String);

impl Violation {
    pub(crate) fn at(self, position: u64) -> crate::Error {
        crate::Error::Structure {
            detail: self.0,
            position,
        }
    }
}

fn violation(detail: impl Into<String>) -> Violation {
    Violation(detail.into())
}

/// The nesting state of one reader or writer instance.
#[derive(Debug, Default)]
pub(crate) struct Structure {
    frames: Vec<Frame>,
}

impl Structure {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Stack depth, property-value frames included.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// The open frames, outermost first, for `UnclosedItems` messages.
    pub(crate) fn describe(&self) -> String {
        let mut out = String::new();
        for frame in &self.frames {
            out.push('/');
            out.push_str(frame.name());
        }
        out
    }

    /// Validate a comma under strict rules: legal only directly inside a
    /// container that already holds at least one item.
    pub(crate) fn comma(&self) -> Result<(), Violation> {
        match self.top() {
            Some(Frame::Object { nonempty: true }) | Some(Frame::Array { nonempty: true }) => {
                Ok(())
            }
            _ => Err(violation("unexpected ','")),
        }
    }

    /// Validate a comma under lenient rules: any open container will do.
    pub(crate) fn stray_comma(&self) -> Result<(), Violation> {
        match self.top() {
            Some(Frame::Object { .. }) | Some(Frame::Array { .. }) => Ok(()),
            _ => Err(violation("unexpected ','")),
        }
    }

    /// Consume the key/value separator of the topmost property.
    pub(crate) fn colon(&mut self) -> Result<(), Violation> {
        match self.frames.last_mut() {
            Some(Frame::Property { colon }) if !*colon => {
                *colon = true;
                Ok(())
            }
            _ => Err(violation("unexpected ':'")),
        }
    }

    /// Check that a new item may start here, without attaching it yet.
    ///
    /// `separated` tells whether a comma was consumed since the previous
    /// item of the enclosing container.
    fn enter(&self, what: &str, separated: bool) -> Result<Slot, Violation> {
        match self.top() {
            None => Ok(Slot::Root),
            Some(Frame::Array { nonempty }) => {
                if *nonempty && !separated {
                    Err(violation(format!("missing ',' before {what}")))
                } else if *nonempty {
                    Ok(Slot::NextValue)
                } else {
                    Ok(Slot::FirstValue)
                }
            }
            Some(Frame::Property { colon: true }) => Ok(Slot::PropertyValue),
            Some(Frame::Property { colon: false }) => {
                Err(violation(format!("missing ':' before {what}")))
            }
            Some(Frame::Object { .. }) => {
                Err(violation(format!("expected property key, not {what}")))
            }
        }
    }

    /// Mark the enclosing array as populated after a value landed in it.
    fn settle(&mut self, slot: Slot) {
        if let (Slot::FirstValue, Some(top)) = (slot, self.frames.last_mut()) {
            if let Frame::Array { nonempty } = top {
                *nonempty = true;
            }
        }
    }

    /// Open a nested object.
    ///
    /// A property-value frame beneath it stays on the stack until the
    /// object closes.
    pub(crate) fn open_object(&mut self, separated: bool) -> Result<Slot, Violation> {
        let slot = self.enter("an object", separated)?;
        self.settle(slot);
        self.frames.push(Frame::Object { nonempty: false });
        Ok(slot)
    }

    /// Open a nested array.
    pub(crate) fn open_array(&mut self, separated: bool) -> Result<Slot, Violation> {
        let slot = self.enter("an array", separated)?;
        self.settle(slot);
        self.frames.push(Frame::Array { nonempty: false });
        Ok(slot)
    }

    /// Start a property inside the topmost object.
    ///
    /// Returns whether this is the first property of the object. `colon`
    /// is `true` for the writer, which never sees a separator character.
    pub(crate) fn property_key(&mut self, separated: bool, colon: bool) -> Result<bool, Violation> {
        let first = match self.frames.last_mut() {
            Some(Frame::Object { nonempty }) => {
                if *nonempty && !separated {
                    return Err(violation("missing ',' before property key"));
                }
                let first = !*nonempty;
                *nonempty = true;
                first
            }
            Some(other) => {
                return Err(violation(format!(
                    "property key not allowed inside {}",
                    other.name()
                )))
            }
            None => return Err(violation("property key not allowed at document root")),
        };
        self.frames.push(Frame::Property { colon });
        Ok(first)
    }

    /// Attach a scalar value, popping the property frame it satisfies.
    pub(crate) fn scalar(&mut self, separated: bool) -> Result<Slot, Violation> {
        let slot = match self.enter("a value", separated)? {
            Slot::Root => return Err(violation("no scalar value allowed at document root")),
            slot => slot,
        };
        self.settle(slot);
        if slot == Slot::PropertyValue {
            self.frames.pop();
        }
        Ok(slot)
    }

    /// Close the topmost object; returns whether it held any property.
    pub(crate) fn close_object(&mut self, separated: bool) -> Result<bool, Violation> {
        self.close(separated, "'}'", |f| matches!(f, Frame::Object { .. }))
    }

    /// Close the topmost array; returns whether it held any value.
    pub(crate) fn close_array(&mut self, separated: bool) -> Result<bool, Violation> {
        self.close(separated, "']'", |f| matches!(f, Frame::Array { .. }))
    }

    fn close(
        &mut self,
        separated: bool,
        what: &str,
        matching: impl Fn(&Frame) -> bool,
    ) -> Result<bool, Violation> {
        let top = match self.top() {
            Some(top) if matching(top) => *top,
            Some(top) => {
                return Err(violation(format!(
                    "not matching open item for {what}: {}",
                    top.name()
                )))
            }
            None => return Err(violation(format!("{what} without open item"))),
        };
        if separated {
            return Err(violation(format!("trailing ',' before {what}")));
        }
        self.frames.pop();
        // the closed container was itself a property value
        if let Some(Frame::Property { .. }) = self.top() {
            self.frames.pop();
        }
        let nonempty = match top {
            Frame::Object { nonempty } | Frame::Array { nonempty } => nonempty,
            Frame::Property { .. } => unreachable!("matched above"),
        };
        Ok(nonempty)
    }
}
