mod fork;
pub use fork::Fork;

/// L2 block heights at which each protocol fork activates.
///
/// Ontake and Pacaya are active from their height on, a zero height meaning
/// active since genesis. Later forks use zero for "not scheduled".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForkHeights {
    pub ontake: u64,
    pub pacaya: u64,
    pub shasta: u64,
    pub unzen: u64,
}

impl ForkHeights {
    pub fn activation_height(&self, fork: Fork) -> Option<u64> {
        match fork {
            Fork::Ontake => Some(self.ontake),
            Fork::Pacaya => Some(self.pacaya),
            Fork::Shasta => (self.shasta != 0).then_some(self.shasta),
            Fork::Unzen => (self.unzen != 0).then_some(self.unzen),
        }
    }

    pub fn is_active(&self, fork: Fork, l2_block: u64) -> bool {
        self.activation_height(fork)
            .is_some_and(|height| l2_block >= height)
    }

    /// Fork governing `l2_block`. Blocks before Ontake are reported as Ontake.
    pub fn fork_at(&self, l2_block: u64) -> Fork {
        let mut current = Fork::Ontake;
        while let Some(next) = current.next() {
            if !self.is_active(next, l2_block) {
                break;
            }
            current = next;
        }
        current
    }
}

/// Fork state of the chain at a given L2 height.
#[derive(Clone, Debug)]
pub struct ForkInfo {
    pub fork: Fork,
    pub heights: ForkHeights,
}

impl ForkInfo {
    pub fn new(heights: ForkHeights, l2_height: u64) -> Self {
        Self {
            fork: heights.fork_at(l2_height),
            heights,
        }
    }

    /// Height at which the fork after the current one activates, if scheduled.
    pub fn next_fork_height(&self) -> Option<(Fork, u64)> {
        let next = self.fork.next()?;
        self.heights
            .activation_height(next)
            .map(|height| (next, height))
    }

    pub fn is_next_fork_active(&self, l2_height: u64) -> bool {
        self.fork
            .next()
            .is_some_and(|next| self.heights.is_active(next, l2_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heights() -> ForkHeights {
        ForkHeights {
            ontake: 10,
            pacaya: 20,
            shasta: 0,
            unzen: 0,
        }
    }

    #[test]
    fn test_fork_at() {
        let heights = heights();
        assert_eq!(heights.fork_at(0), Fork::Ontake);
        assert_eq!(heights.fork_at(19), Fork::Ontake);
        assert_eq!(heights.fork_at(20), Fork::Pacaya);
        assert_eq!(heights.fork_at(u64::MAX), Fork::Pacaya);

        let scheduled = ForkHeights {
            shasta: 100,
            ..heights
        };
        assert_eq!(scheduled.fork_at(99), Fork::Pacaya);
        assert_eq!(scheduled.fork_at(100), Fork::Shasta);
    }

    #[test]
    fn test_pacaya_from_genesis() {
        let heights = ForkHeights::default();
        assert_eq!(heights.fork_at(0), Fork::Pacaya);
        assert!(heights.activation_height(Fork::Shasta).is_none());
    }

    #[test]
    fn test_next_fork() {
        let info = ForkInfo::new(heights(), 25);
        assert_eq!(info.fork, Fork::Pacaya);
        assert_eq!(info.next_fork_height(), None);
        assert!(!info.is_next_fork_active(1_000));

        let info = ForkInfo::new(
            ForkHeights {
                shasta: 50,
                ..heights()
            },
            25,
        );
        assert_eq!(info.next_fork_height(), Some((Fork::Shasta, 50)));
        assert!(info.is_next_fork_active(50));
    }

    #[test]
    fn test_fork_parse_and_display() {
        assert_eq!("Pacaya".parse::<Fork>().unwrap(), Fork::Pacaya);
        assert_eq!("unzen".parse::<Fork>().unwrap(), Fork::Unzen);
        assert!("london".parse::<Fork>().is_err());
        assert_eq!(Fork::Shasta.to_string(), "Shasta");
        assert_eq!(Fork::Unzen.next(), None);
    }
}
