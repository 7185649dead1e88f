use crate::model::Continuation;

/// FIFO of continuations due to resume on the next tick. Completions push
/// here instead of resuming inline; the world drains the queue once per
/// tick, which bounds call depth and keeps side effects frame-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallbackQueue {
    pending: Vec<Continuation>,
}

impl CallbackQueue {
    pub fn add(&mut self, cb: Continuation) {
        self.pending.push(cb);
    }

    /// Takes the current batch. Continuations enqueued while the batch is
    /// being resumed land in the fresh queue and run on the next drain.
    pub fn drain(&mut self) -> Vec<Continuation> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn pending(&self) -> &[Continuation] {
        &self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{VerbOwner, VerbRef};

    fn cb(key: &str) -> Continuation {
        Continuation::Verb(VerbRef {
            owner: VerbOwner::Default,
            key: key.to_string(),
        })
    }

    #[test]
    fn drains_in_fifo_order() {
        let mut queue = CallbackQueue::default();
        queue.add(cb("first"));
        queue.add(cb("second"));
        queue.add(cb("third"));

        let drained = queue.drain();
        assert_eq!(drained, vec![cb("first"), cb("second"), cb("third")]);
        assert!(queue.is_empty());
    }

    #[test]
    fn additions_during_a_drain_wait_for_the_next_one() {
        let mut queue = CallbackQueue::default();
        queue.add(cb("now"));

        let batch = queue.drain();
        for _ in batch {
            queue.add(cb("later"));
        }

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain(), vec![cb("later")]);
    }
}
