// Expression operators and their expansion behavior
//
// Uses a closed enum plus a const behavior table instead of one type per
// operator (no heap allocation, no vtable dispatch).

/// Operator selected by the first character after `{`, controlling the
/// prefix, separator, `key=value` form, and encoding mode of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    None,
    Plus,
    Hash,
    Dot,
    Slash,
    Semicolon,
    Question,
    Amp,
}

/// Static expansion facts for one operator.
struct OpInfo {
    prefix: &'static str,
    separator: char,
    named: bool,
    allow_reserved: bool,
}

// Indexed by `Operator` discriminant; keep the rows in enum order.
const OP_TABLE: [OpInfo; 8] = [
    OpInfo { prefix: "", separator: ',', named: false, allow_reserved: false }, // None
    OpInfo { prefix: "", separator: ',', named: false, allow_reserved: true },  // Plus
    OpInfo { prefix: "#", separator: ',', named: false, allow_reserved: true }, // Hash
    OpInfo { prefix: ".", separator: '.', named: false, allow_reserved: false }, // Dot
    OpInfo { prefix: "/", separator: '/', named: false, allow_reserved: false }, // Slash
    OpInfo { prefix: ";", separator: ';', named: true, allow_reserved: false }, // Semicolon
    OpInfo { prefix: "?", separator: '&', named: true, allow_reserved: false }, // Question
    OpInfo { prefix: "&", separator: '&', named: true, allow_reserved: false }, // Amp
];

impl Operator {
    /// Operator selected by a leading expression character, if any.
    pub(crate) fn from_lead(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Plus),
            '#' => Some(Operator::Hash),
            '.' => Some(Operator::Dot),
            '/' => Some(Operator::Slash),
            ';' => Some(Operator::Semicolon),
            '?' => Some(Operator::Question),
            '&' => Some(Operator::Amp),
            _ => None,
        }
    }

    fn info(self) -> &'static OpInfo {
        &OP_TABLE[self as usize]
    }

    /// Emitted once before the first non-empty varspec output of an
    /// expression.
    pub(crate) fn prefix(self) -> &'static str {
        self.info().prefix
    }

    /// Emitted between successive non-empty varspec outputs.
    pub(crate) fn separator(self) -> char {
        self.info().separator
    }

    /// Whether output takes the `key=value` form.
    pub(crate) fn named(self) -> bool {
        self.info().named
    }

    /// Whether reserved characters and valid percent-triplets pass through
    /// unescaped.
    pub(crate) fn allow_reserved(self) -> bool {
        self.info().allow_reserved
    }
}
