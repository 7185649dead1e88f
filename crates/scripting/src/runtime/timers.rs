use crate::model::Continuation;

#[derive(Debug, Clone, PartialEq)]
pub struct TimerEntry {
    time: f32,
    current_time: f32,
    /// `None` after a load that could not resolve the saved address; the
    /// entry still expires on schedule, it just resumes nothing.
    cb: Option<Continuation>,
}

impl TimerEntry {
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn cb(&self) -> Option<&Continuation> {
        self.cb.as_ref()
    }
}

/// One-shot timer scheduler. Entries fire once their elapsed time reaches
/// the deadline and are removed in the same pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timers {
    entries: Vec<TimerEntry>,
}

impl Timers {
    pub fn add(&mut self, time: f32, cb: Continuation) {
        self.entries.push(TimerEntry {
            time,
            current_time: 0.0,
            cb: Some(cb),
        });
    }

    pub(crate) fn restore(&mut self, time: f32, current_time: f32, cb: Option<Continuation>) {
        self.entries.push(TimerEntry {
            time,
            current_time,
            cb,
        });
    }

    /// Cancels the first entry holding an equal continuation.
    pub fn remove_with_cb(&mut self, cb: &Continuation) -> bool {
        match self
            .entries
            .iter()
            .position(|entry| entry.cb.as_ref() == Some(cb))
        {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Advances every entry and returns the continuations that came due.
    /// Expired entries are removed during the pass, but nothing is resumed
    /// until the pass is over: a resumed continuation may add new timers to
    /// this very list, which must not be mutated mid-iteration.
    #[must_use = "the returned continuations still have to be resumed"]
    pub fn update(&mut self, delta: f32) -> Vec<Continuation> {
        let mut fired = Vec::new();

        let mut index = 0;
        while index < self.entries.len() {
            let entry = &mut self.entries[index];
            entry.current_time += delta;

            if entry.current_time >= entry.time {
                if let Some(cb) = self.entries.remove(index).cb {
                    fired.push(cb);
                }
            } else {
                index += 1;
            }
        }

        fired
    }

    pub fn entries(&self) -> &[TimerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
