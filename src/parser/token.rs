use crate::op::{AssignOp, BinaryOp};

#[derive(Clone, PartialEq, Debug)]
pub enum Token {
    Ctrl(Ctrl),
    Ident(String),
    Int(String),
    Float(String),
    Char(String),
    String(String),
    KeyWord(KeyWord),
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Ctrl {
    Not,
    Divide,
    Modulo,
    And,
    Or,
    Lt,
    Lte,
    Gt,
    Gte,
    NotEqual,
    ShiftLeft,
    ShiftRight,
    Multiply,
    DoubleEqual,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftCurly,
    RightCurly,
    Comma,
    Colon,
    Question,
    Equal,
    SemiColon,
    End,
    Period,
    Plus,
    Minus,
    Increment,
    Decrement,
    Carrot,
    Tilde,
    Pipe,
    Ampersand,
    PlusEqual,
    MinusEqual,
    MultiplyEqual,
    DivideEqual,
    ModuloEqual,
    ShiftLeftEqual,
    ShiftRightEqual,
    AmpersandEqual,
    PipeEqual,
    CarrotEqual,
}

impl Ctrl {
    pub fn as_assign_op(&self) -> Option<AssignOp> {
        let op = match self {
            Ctrl::Equal => return Some(AssignOp::Assign),
            Ctrl::PlusEqual => BinaryOp::Plus,
            Ctrl::MinusEqual => BinaryOp::Minus,
            Ctrl::MultiplyEqual => BinaryOp::Multiply,
            Ctrl::DivideEqual => BinaryOp::Divide,
            Ctrl::ModuloEqual => BinaryOp::Modulo,
            Ctrl::ShiftLeftEqual => BinaryOp::ShiftLeft,
            Ctrl::ShiftRightEqual => BinaryOp::ShiftRight,
            Ctrl::AmpersandEqual => BinaryOp::BitAnd,
            Ctrl::PipeEqual => BinaryOp::BitOr,
            Ctrl::CarrotEqual => BinaryOp::BitXor,
            _ => return None,
        };

        Some(AssignOp::Compound(op))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Ctrl::Not => "!",
            Ctrl::Divide => "/",
            Ctrl::Modulo => "%",
            Ctrl::And => "&&",
            Ctrl::Or => "||",
            Ctrl::Lt => "<",
            Ctrl::Lte => "<=",
            Ctrl::Gt => ">",
            Ctrl::Gte => ">=",
            Ctrl::NotEqual => "!=",
            Ctrl::ShiftLeft => "<<",
            Ctrl::ShiftRight => ">>",
            Ctrl::Multiply => "*",
            Ctrl::DoubleEqual => "==",
            Ctrl::LeftParen => "(",
            Ctrl::RightParen => ")",
            Ctrl::LeftBracket => "[",
            Ctrl::RightBracket => "]",
            Ctrl::LeftCurly => "{",
            Ctrl::RightCurly => "}",
            Ctrl::Comma => ",",
            Ctrl::Colon => ":",
            Ctrl::Question => "?",
            Ctrl::Equal => "=",
            Ctrl::SemiColon => ";",
            Ctrl::End => "end of input",
            Ctrl::Period => ".",
            Ctrl::Plus => "+",
            Ctrl::Minus => "-",
            Ctrl::Increment => "++",
            Ctrl::Decrement => "--",
            Ctrl::Carrot => "^",
            Ctrl::Tilde => "~",
            Ctrl::Pipe => "|",
            Ctrl::Ampersand => "&",
            Ctrl::PlusEqual => "+=",
            Ctrl::MinusEqual => "-=",
            Ctrl::MultiplyEqual => "*=",
            Ctrl::DivideEqual => "/=",
            Ctrl::ModuloEqual => "%=",
            Ctrl::ShiftLeftEqual => "<<=",
            Ctrl::ShiftRightEqual => ">>=",
            Ctrl::AmpersandEqual => "&=",
            Ctrl::PipeEqual => "|=",
            Ctrl::CarrotEqual => "^=",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum KeyWord {
    Package,
    Import,
    Class,
    Extends,
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Void,
    Throws,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Boolean,
    If,
    Else,
    Switch,
    Case,
    Default,
    While,
    Do,
    For,
    Break,
    Continue,
    Return,
    Throw,
    Try,
    Catch,
    Finally,
    New,
    This,
    Super,
    Null,
    True,
    False,
    InstanceOf,
}

impl KeyWord {
    pub fn from_word(word: &str) -> Option<KeyWord> {
        let keyword = match word {
            "package" => KeyWord::Package,
            "import" => KeyWord::Import,
            "class" => KeyWord::Class,
            "extends" => KeyWord::Extends,
            "public" => KeyWord::Public,
            "protected" => KeyWord::Protected,
            "private" => KeyWord::Private,
            "abstract" => KeyWord::Abstract,
            "static" => KeyWord::Static,
            "final" => KeyWord::Final,
            "void" => KeyWord::Void,
            "throws" => KeyWord::Throws,
            "byte" => KeyWord::Byte,
            "short" => KeyWord::Short,
            "int" => KeyWord::Int,
            "long" => KeyWord::Long,
            "char" => KeyWord::Char,
            "float" => KeyWord::Float,
            "double" => KeyWord::Double,
            "boolean" => KeyWord::Boolean,
            "if" => KeyWord::If,
            "else" => KeyWord::Else,
            "switch" => KeyWord::Switch,
            "case" => KeyWord::Case,
            "default" => KeyWord::Default,
            "while" => KeyWord::While,
            "do" => KeyWord::Do,
            "for" => KeyWord::For,
            "break" => KeyWord::Break,
            "continue" => KeyWord::Continue,
            "return" => KeyWord::Return,
            "throw" => KeyWord::Throw,
            "try" => KeyWord::Try,
            "catch" => KeyWord::Catch,
            "finally" => KeyWord::Finally,
            "new" => KeyWord::New,
            "this" => KeyWord::This,
            "super" => KeyWord::Super,
            "null" => KeyWord::Null,
            "true" => KeyWord::True,
            "false" => KeyWord::False,
            "instanceof" => KeyWord::InstanceOf,
            _ => return None,
        };

        Some(keyword)
    }

    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            KeyWord::Public
                | KeyWord::Protected
                | KeyWord::Private
                | KeyWord::Abstract
                | KeyWord::Static
                | KeyWord::Final
        )
    }

    pub fn is_primitive_type(&self) -> bool {
        matches!(
            self,
            KeyWord::Byte
                | KeyWord::Short
                | KeyWord::Int
                | KeyWord::Long
                | KeyWord::Char
                | KeyWord::Float
                | KeyWord::Double
                | KeyWord::Boolean
        )
    }
}
