//! Debug-info trees shared by unit tests.

use crate::{
    symbols::{
        ConstantValue, DebugInfo, DocumentLines, IteratorScope, SequencePoint, SourceDocument,
        SymConstant, SymFunction, SymScope, SymVariable,
    },
    token::Token,
};

// Helper function to create a method with two locals and one scope constant:
//
//     int a = 4;      // slot 0
//     int b = 10;     // slot 1
//     const int c = 2;
pub fn answer_function(token: u32) -> SymFunction {
    let mut function = SymFunction::new(Token(token), 0x12);
    function.slot_token = Token(0x1100_0001);
    function.scope.variables = vec![SymVariable::new("a", 0), SymVariable::new("b", 1)];
    function.scope.constants = vec![SymConstant::new("c", ConstantValue::I4(2), Token(0))];
    function
}

// Helper function to create an iterator method with a nested scope and a method-level constant
pub fn evens_function(token: u32) -> SymFunction {
    let mut function = SymFunction::new(Token(token), 0x30);
    function.slot_token = Token(0x1100_0002);
    function.iterator_class = "Evens_Iterator".to_string();
    function.iterator_scopes = vec![IteratorScope::new(5, 20)];
    function.constants = vec![SymConstant::new(
        "Limit",
        ConstantValue::I4(10),
        Token(0),
    )];

    function.scope.variables = vec![SymVariable::compiler_generated("CS$1$0000", 0)];
    let mut body = SymScope::new(5, 20);
    body.variables = vec![SymVariable::new("i", 1)];
    function.scope.scopes.push(body);
    function
}

// Helper function to create a program of three methods over two referenced documents and one
// document no line group uses
pub fn sample_info() -> DebugInfo {
    let mut info = DebugInfo::new();
    let main = info.add_document(SourceDocument::csharp("/src/a.cs"));
    let util = info.add_document(SourceDocument::csharp("/src/util.cs"));
    info.add_document(SourceDocument::csharp("/src/unused.cs"));

    let mut answer = answer_function(0x0600_0001);
    answer.lines = vec![DocumentLines::new(
        main,
        vec![
            SequencePoint::new(0x00, 5, 9, 5, 10),
            SequencePoint::new(0x01, 6, 13, 6, 23),
            SequencePoint::new(0x11, 7, 5, 7, 6),
        ],
    )];

    let mut evens = evens_function(0x0600_0002);
    evens.lines = vec![
        DocumentLines::new(main, vec![SequencePoint::new(0x00, 10, 5, 10, 6)]),
        DocumentLines::new(
            util,
            vec![
                SequencePoint::new(0x05, 3, 9, 3, 20),
                SequencePoint::hidden(0x19),
            ],
        ),
    ];

    let mut helper = SymFunction::new(Token(0x0600_0003), 0x08);
    helper.lines = vec![DocumentLines::new(
        util,
        vec![SequencePoint::new(0x00, 12, 5, 12, 30)],
    )];

    info.functions = vec![answer, evens, helper];
    info.entry_point = Some(Token(0x0600_0001));
    info
}

// Helper function to create a chain of `levels` scopes, each the only child of the previous
pub fn nested_scopes(levels: usize) -> SymScope {
    let mut scope = SymScope::new(0, 0);
    for _ in 1..levels {
        let mut parent = SymScope::new(0, 0);
        parent.scopes.push(scope);
        scope = parent;
    }
    scope
}

// Tear a scope tree down without the recursive drop glue, so deep chains can be freed
pub fn dismantle(scope: SymScope) {
    let mut pending = vec![scope];
    while let Some(mut scope) = pending.pop() {
        pending.append(&mut scope.scopes);
    }
}
