//! A small typed Go declaration AST. Synthesizers build these
//! trees; [`crate::printer`] is the only thing that turns them into text.

#[derive(Debug, Clone, PartialEq)]
pub struct GoParam {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoField {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoMethodSig {
    pub name: String,
    pub params: Vec<GoParam>,
    pub returns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoInterface {
    pub name: String,
    pub methods: Vec<GoMethodSig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoStruct {
    pub name: String,
    pub fields: Vec<GoField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoFunc {
    pub name: String,
    pub receiver: Option<GoParam>,
    pub params: Vec<GoParam>,
    pub returns: Vec<String>,
    pub body: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GoDecl {
    Interface(GoInterface),
    Struct(GoStruct),
    Func(GoFunc),
}
