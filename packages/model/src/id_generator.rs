use crate::node::NodeId;
use crate::tree::PageTree;
use crc32fast::Hasher;

/// Generate a document seed from a page identity using CRC32
pub fn get_document_id(page: &str) -> String {
    let mut buff = String::from(page);
    if !page.starts_with("page://") {
        buff = format!("page://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Highest counter [`IdGenerator::observe`] will advance to. Loaded ids past
/// it are left for the loader to regenerate.
pub const COUNTER_LIMIT: u64 = u64::MAX / 2;

/// Sequential id generator for tree nodes within a document
///
/// Ids have the form `{seed}-{count}`. The counter only moves forward, so an
/// id handed out once is never handed out again by the same generator, even
/// after the node it named was deleted and the deletion undone.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(page: &str) -> Self {
        Self {
            seed: get_document_id(page),
            count: 0,
        }
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Create a generator for an existing tree.
    ///
    /// The counter starts past every id in `tree` that was minted with the
    /// same seed, so freshly generated ids cannot collide with loaded ones.
    pub fn for_tree(page: &str, tree: &PageTree) -> Self {
        let mut generator = Self::new(page);
        generator.observe(tree);
        generator
    }

    /// Advance the counter past any `{seed}-{n}` id present in `tree`
    ///
    /// Counters above [`COUNTER_LIMIT`] are skipped.
    pub fn observe(&mut self, tree: &PageTree) {
        for node in tree.iter() {
            if let Some(n) = self.counter_of(&node.id) {
                if n <= COUNTER_LIMIT {
                    self.count = self.count.max(n);
                }
            }
        }
    }

    /// Whether `id` looks like one of ours but sits past [`COUNTER_LIMIT`]
    pub fn is_out_of_range(&self, id: &NodeId) -> bool {
        self.counter_of(id).map_or(false, |n| n > COUNTER_LIMIT)
    }

    fn counter_of(&self, id: &NodeId) -> Option<u64> {
        id.as_str()
            .strip_prefix(self.seed.as_str())?
            .strip_prefix('-')?
            .parse::<u64>()
            .ok()
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> NodeId {
        self.count = match self.count.checked_add(1) {
            Some(next) => next,
            None => {
                // counter exhausted, continue under a derived seed
                self.seed = format!("{}-{}", self.seed, self.count);
                1
            }
        };
        NodeId::new(format!("{}-{}", self.seed, self.count))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::settings::Settings;

    #[test]
    fn test_document_id_generation() {
        let id1 = get_document_id("about");
        let id2 = get_document_id("about");
        assert_eq!(id1, id2);

        let id3 = get_document_id("contact");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("home");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert!(id1.as_str().ends_with("-1"));
        assert!(id2.as_str().ends_with("-2"));
        assert!(id1.as_str().starts_with(gen.seed()));
    }

    #[test]
    fn test_for_tree_skips_existing_ids() {
        let seed = get_document_id("home");
        let tree = PageTree::from_roots(vec![Node::section(
            NodeId::new(format!("{}-7", seed)),
            Settings::default(),
        )
        .with_children(vec![Node::column(
            NodeId::new(format!("{}-3", seed)),
            Settings::default(),
        )])]);

        let mut gen = IdGenerator::for_tree("home", &tree);
        assert_eq!(gen.count(), 7);
        assert_eq!(gen.new_id().as_str(), format!("{}-8", seed));
    }

    #[test]
    fn test_foreign_ids_are_ignored() {
        let tree = PageTree::from_roots(vec![Node::section(
            NodeId::new("legacy-42"),
            Settings::default(),
        )]);

        let gen = IdGenerator::for_tree("home", &tree);
        assert_eq!(gen.count(), 0);
    }

    #[test]
    fn test_huge_counters_are_not_observed() {
        let seed = get_document_id("home");
        let huge = NodeId::new(format!("{}-{}", seed, u64::MAX));
        let tree = PageTree::from_roots(vec![Node::section(huge.clone(), Settings::default())]);

        let mut gen = IdGenerator::for_tree("home", &tree);
        assert_eq!(gen.count(), 0);
        assert!(gen.is_out_of_range(&huge));
        assert!(!gen.is_out_of_range(&NodeId::new(format!("{}-3", seed))));
        assert!(!gen.is_out_of_range(&NodeId::new("legacy-99999999999999999999")));
        assert_eq!(gen.new_id().as_str(), format!("{}-1", seed));
    }

    #[test]
    fn test_exhausted_counter_does_not_overflow() {
        let mut gen = IdGenerator {
            seed: "s".to_string(),
            count: u64::MAX,
        };
        let id = gen.new_id();
        assert_eq!(id.as_str(), format!("s-{}-1", u64::MAX));
        assert_eq!(gen.new_id().as_str(), format!("s-{}-2", u64::MAX));
    }

    proptest::proptest! {
        #[test]
        fn observed_ids_are_never_reissued(existing in proptest::collection::vec(1..500u64, 0..20)) {
            let seed = get_document_id("home");
            let columns = existing
                .iter()
                .map(|n| Node::column(NodeId::new(format!("{}-{}", seed, n)), Settings::default()))
                .collect();
            let tree = PageTree::from_roots(vec![
                Node::section(NodeId::new("root"), Settings::default()).with_children(columns),
            ]);

            let mut gen = IdGenerator::for_tree("home", &tree);
            for _ in 0..5 {
                let id = gen.new_id();
                proptest::prop_assert!(!tree.contains(&id));
            }
        }
    }
}
