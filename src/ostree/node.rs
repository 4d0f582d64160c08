/// Index of a node in the tree's arena.
pub type Link = Option<usize>;

#[derive(Debug, Clone)]
pub struct Node<T> {
    pub value: T,
    // occurrences of `value`
    pub count: usize,
    // occurrences in this subtree, `count` included
    pub size: usize,
    pub height: u32,
    pub left: Link,
    pub right: Link,
}

impl<T> Node<T> {
    pub fn leaf(value: T) -> Node<T> {
        Node {
            value: value,
            count: 1,
            size: 1,
            height: 1,
            left: None,
            right: None,
        }
    }
}
