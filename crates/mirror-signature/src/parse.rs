use crate::error::{Error, Result};
use crate::signature::{ClassType, PrimitiveType, Signature, WildcardBound};

pub(crate) fn parse_signature(input: &str) -> Result<Signature> {
    if input.is_empty() {
        return Err(Error::Empty);
    }
    let mut parser = Parser { input, pos: 0 };
    let sig = parser.signature()?;
    if parser.pos != input.len() {
        return Err(Error::Trailing {
            signature: input[..parser.pos].to_string(),
            rest: input[parser.pos..].to_string(),
        });
    }
    Ok(sig)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) -> Result<u8> {
        let b = self
            .peek()
            .ok_or_else(|| Error::UnexpectedEnd(self.input.to_string()))?;
        self.pos += 1;
        Ok(b)
    }

    fn rest(&self) -> String {
        self.input[self.pos.min(self.input.len())..].to_string()
    }

    fn signature(&mut self) -> Result<Signature> {
        let start = self.pos;
        let kind = self.bump()?;
        match kind {
            b'*' => Ok(Signature::Wildcard(None)),
            b'+' => {
                let bound = self.component()?;
                Ok(Signature::Wildcard(Some(WildcardBound::Extends(Box::new(
                    bound,
                )))))
            }
            b'-' => {
                let bound = self.component()?;
                Ok(Signature::Wildcard(Some(WildcardBound::Super(Box::new(
                    bound,
                )))))
            }
            b'[' => {
                let mut depth = 1usize;
                while self.peek() == Some(b'[') {
                    self.pos += 1;
                    depth += 1;
                }
                let element = self.component()?;
                Ok(Signature::array(element, depth))
            }
            b'|' => {
                let element = self.component()?;
                Ok(Signature::Vararg(Box::new(element)))
            }
            b'T' => {
                let name = self.identifier(&[b';'])?;
                self.expect(b';')?;
                Ok(Signature::TypeVar(name))
            }
            b'L' | b'Q' => self.class(kind == b'L'),
            other => match PrimitiveType::from_code(other as char) {
                Some(p) => Ok(Signature::Primitive(p)),
                None => Err(Error::UnknownKind {
                    kind: other as char,
                    fragment: self.input[start..].to_string(),
                }),
            },
        }
    }

    /// A signature used as the component of an array, vararg or wildcard bound.
    fn component(&mut self) -> Result<Signature> {
        let start = self.pos;
        let sig = self.signature()?;
        if matches!(sig, Signature::Primitive(PrimitiveType::Void)) {
            return Err(Error::MisplacedVoid(self.input[start..].to_string()));
        }
        Ok(sig)
    }

    fn class(&mut self, resolved: bool) -> Result<Signature> {
        let mut name = self.identifier(&[b'<', b';'])?;
        let mut args = Vec::new();
        loop {
            match self.bump()? {
                b';' => break,
                b'<' => {
                    self.type_arguments(&mut args)?;
                    match self.bump()? {
                        b';' => break,
                        b'.' => {
                            // `LOuter<TT;>.Inner<TU;>;`: flatten the member segment.
                            let segment = self.identifier(&[b'<', b';'])?;
                            name.push('$');
                            name.push_str(&segment);
                        }
                        other => {
                            return Err(Error::UnknownKind {
                                kind: other as char,
                                fragment: self.input[self.pos - 1..].to_string(),
                            })
                        }
                    }
                }
                _ => unreachable!("identifier stops at '<' or ';'"),
            }
        }
        Ok(Signature::Class(ClassType {
            name,
            args,
            resolved,
        }))
    }

    fn type_arguments(&mut self, out: &mut Vec<Signature>) -> Result<()> {
        loop {
            match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => out.push(self.component()?),
                None => return Err(Error::Unterminated(self.input.to_string())),
            }
        }
    }

    fn identifier(&mut self, stops: &[u8]) -> Result<String> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if stops.contains(&b) {
                let raw = &self.input[start..self.pos];
                if raw.is_empty() {
                    return Err(Error::UnexpectedEnd(self.rest()));
                }
                return Ok(raw.replace('/', "."));
            }
            self.pos += 1;
        }
        Err(Error::UnexpectedEnd(self.input[start..].to_string()))
    }

    fn expect(&mut self, b: u8) -> Result<()> {
        match self.bump()? {
            got if got == b => Ok(()),
            got => Err(Error::UnknownKind {
                kind: got as char,
                fragment: self.input[self.pos - 1..].to_string(),
            }),
        }
    }
}
