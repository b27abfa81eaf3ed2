use std::fmt::Display;

/// Object program records. Hex is upper-cased on emission; the header name
/// is space-padded to six columns, addresses and lengths zero-padded to six.
#[derive(Debug)]
pub enum Record {
    Header {
        name: String,
        start: String,
        length: u32,
    },
    Text(Text),
    End {
        first_instruction: u32,
    },
}

/// An in-flight text record: the address captured when the record was
/// opened, plus the hex payload accumulated so far.
#[derive(Debug)]
pub struct Text {
    pub address: String,
    pub code: String,
}

impl Text {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_owned(),
            code: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn push(&mut self, object_code: &str) {
        self.code.push_str(object_code);
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Record::Header {
                name,
                start,
                length,
            } => {
                write!(f, "H{:<6}{:0>6}{:0>6X}", name, start.to_uppercase(), length)
            }
            Record::Text(text) => write!(
                f,
                "T{:0>6}{:0>2X}{}",
                text.address.to_uppercase(),
                text.code.len() / 2,
                text.code.to_uppercase()
            ),
            Record::End { first_instruction } => write!(f, "E{:0>6X}", first_instruction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_format() {
        let header = Record::Header {
            name: "PROG".to_owned(),
            start: "1000".to_owned(),
            length: 6,
        };
        assert_eq!(header.to_string(), "HPROG  001000000006");

        let default = Record::Header {
            name: "NONAME".to_owned(),
            start: "00000".to_owned(),
            length: 0x2A,
        };
        assert_eq!(default.to_string(), "HNONAME00000000002A");
    }

    #[test]
    fn text_format() {
        let mut text = Text::new("1000");
        text.push("001003");
        text.push("000007");
        assert_eq!(
            Record::Text(text).to_string(),
            "T00100006001003000007"
        );
    }

    #[test]
    fn end_format() {
        let end = Record::End {
            first_instruction: 0x1000,
        };
        assert_eq!(end.to_string(), "E001000");
    }
}
