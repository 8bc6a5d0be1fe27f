//! Class labels of the static fingerspelling model

/// Letters that can be signed with a still hand, in class-index order.
///
/// J and Z need motion and are not part of the static model.
pub const STATIC_LETTERS: [&str; 24] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y",
];

pub fn label_for_index(index: usize) -> Option<&'static str> {
    STATIC_LETTERS.get(index).copied()
}
