use crate::ast::criterion::FieldRef;
use crate::ast::operators::SortOrder;

/// ORDER BY keys as a singly linked chain.
///
/// The outermost node is the primary key, `next` holds the secondary and
/// further keys. Repeated fields are not de-duplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingChain {
    pub field: FieldRef,
    pub order: SortOrder,
    pub next: Option<Box<OrderingChain>>,
}

impl OrderingChain {
    /// Build outer-to-inner: `self` sorts before everything in `next`.
    pub fn new(field: FieldRef, ascending: bool, next: Option<OrderingChain>) -> Self {
        Self {
            field,
            order: SortOrder::from_ascending(ascending),
            next: next.map(Box::new),
        }
    }

    pub fn asc(field: FieldRef) -> Self {
        Self::new(field, true, None)
    }

    pub fn desc(field: FieldRef) -> Self {
        Self::new(field, false, None)
    }

    pub fn then_asc(self, field: FieldRef) -> Self {
        self.then(Self::asc(field))
    }

    pub fn then_desc(self, field: FieldRef) -> Self {
        self.then(Self::desc(field))
    }

    /// Append `tail` after the last key of this chain.
    pub fn then(mut self, tail: OrderingChain) -> Self {
        let next = match self.next.take() {
            Some(next) => (*next).then(tail),
            None => tail,
        };
        self.next = Some(Box::new(next));
        self
    }

    /// Keys in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = &OrderingChain> {
        std::iter::successors(Some(self), |node| node.next.as_deref())
    }

    /// Number of sort keys, always at least one.
    pub fn len(&self) -> usize {
        self.iter().count()
    }
}
