use assert_matches::assert_matches;
use solfront_ast::{walk, AstNode, Decl, Statement, Visitor};
use solfront_error::error::CompileError;
use solfront_parse::parse;
use solfront_types::{LineIndex, Spanned};

#[test]
fn a_full_contract_parses_cleanly() {
    let source = r#"
contract Vault is Ownable {
    uint256 public totalDeposits;
    mapping_t internal ledger;

    event Deposited(address indexed who, uint256 amount);

    using SafeCast for uint256;

    function deposit(uint256 amount) public payable returns (bool) {
        // Funds are counted before the event fires.
        if (amount > 0) {
            unchecked {
                totalDeposits += amount;
            }
            return true;
        }
        return false;
    }

    function peek() external view returns (uint256);
}
"#;
    let (unit, diagnostics) = parse("vault.sol", source);
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
    assert_eq!(unit.decls.len(), 1);
    let contract = match &unit.decls[0] {
        Decl::Contract(contract) => contract,
        other => panic!("expected a contract, got {other:?}"),
    };
    assert_eq!(contract.name.as_str(), "Vault");
    assert_eq!(contract.body.decls.len(), 6);
    assert_matches!(contract.body.decls[0], Decl::StateVariable(_));
    assert_matches!(contract.body.decls[2], Decl::Event(_));
    assert_matches!(contract.body.decls[3], Decl::UsingFor(_));
    assert_matches!(&contract.body.decls[4], Decl::Function(function) => {
        assert!(function.body.is_some());
    });
    assert_matches!(&contract.body.decls[5], Decl::Function(function) => {
        assert!(function.body.is_none());
    });
}

#[test]
fn statements_inside_a_body() {
    let source = r#"
contract T {
    function f() internal {
        uint256 a = 1;
        (address owner,, uint256 balance) = splitOf(a);
        owner.notify(balance);
        a++;
    }
}
"#;
    let (unit, diagnostics) = parse("t.sol", source);
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
    let body = match &unit.decls[0] {
        Decl::Contract(contract) => match &contract.body.decls[0] {
            Decl::Function(function) => function.body.as_ref().unwrap(),
            other => panic!("expected a function, got {other:?}"),
        },
        other => panic!("expected a contract, got {other:?}"),
    };
    assert_eq!(body.statements.len(), 4);
    assert_matches!(&body.statements[1], Statement::TupleVariableDecl(decl) => {
        assert_eq!(decl.slots.len(), 3);
        assert!(decl.slots[1].is_none());
    });
    assert_matches!(&body.statements[2], Statement::Expr(stmt) => {
        assert_eq!(stmt.expr.to_string(), "owner.notify(balance)");
    });
}

#[test]
fn a_parenthesized_statement_is_an_expression() {
    let (unit, diagnostics) = parse("t.sol", "contract C { function f() public { (x); } }");
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
    let body = match &unit.decls[0] {
        Decl::Contract(contract) => match &contract.body.decls[0] {
            Decl::Function(function) => function.body.as_ref().unwrap(),
            other => panic!("expected a function, got {other:?}"),
        },
        other => panic!("expected a contract, got {other:?}"),
    };
    assert_matches!(&body.statements[0], Statement::Expr(stmt) => {
        assert_eq!(stmt.expr.to_string(), "x");
    });
}

#[test]
fn every_bad_statement_gets_its_own_diagnostic() {
    let source = r#"
contract T {
    function f() public {
        x = ;
        y = 2;
        z = = 3;
        w = 4;
    }
}
"#;
    let (unit, diagnostics) = parse("t.sol", source);
    assert_eq!(diagnostics.len(), 2);
    let body = match &unit.decls[0] {
        Decl::Contract(contract) => match &contract.body.decls[0] {
            Decl::Function(function) => function.body.as_ref().unwrap(),
            other => panic!("expected a function, got {other:?}"),
        },
        other => panic!("expected a contract, got {other:?}"),
    };
    // The two good statements survive the two bad ones.
    assert_eq!(body.statements.len(), 2);
}

#[test]
fn a_bad_declaration_does_not_take_its_neighbors_down() {
    let source = "event Broken(uint256;\nuint256 counter;\ncontract Ok { }\n";
    let (unit, diagnostics) = parse("broken.sol", source);
    assert!(!diagnostics.is_empty());
    // Recovery eats up to the `;`, so both later declarations still parse.
    assert_matches!(unit.decls.last(), Some(Decl::Contract(contract)) => {
        assert_eq!(contract.name.as_str(), "Ok");
    });
}

#[test]
fn lexical_errors_surface_with_line_and_column() {
    let source = "uint256 a;\nuint256 \u{7}b;\n";
    let (unit, diagnostics) = parse("bad.sol", source);
    assert!(unit.decls.is_empty());
    // An empty declaration list means an empty span union.
    assert!(unit.span.is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert_matches!(&diagnostics[0], CompileError::Lex { .. });
    let index = LineIndex::new(source);
    let at = index.line_col(diagnostics[0].span().start());
    assert_eq!((at.line, at.col), (2, 9));
}

#[test]
fn diagnostics_carry_the_offending_span() {
    let (_, diagnostics) = parse("t.sol", "uint256 = 5;");
    assert_eq!(diagnostics.len(), 1);
    assert_matches!(&diagnostics[0], CompileError::Parse { error } => {
        assert_eq!(error.span.as_str(), "=");
    });
}

#[test]
fn an_empty_file_yields_an_empty_unit() {
    let (unit, diagnostics) = parse("empty.sol", "");
    assert!(diagnostics.is_empty());
    assert!(unit.decls.is_empty());
    assert!(unit.span.is_empty());
}

#[test]
fn every_walked_node_has_a_well_formed_span() {
    struct SpanCheck {
        entered: usize,
        finished: usize,
    }

    impl Visitor for SpanCheck {
        fn visit(&mut self, node: Option<AstNode<'_>>) -> bool {
            match node {
                Some(node) => {
                    let span = node.span();
                    assert!(span.end() >= span.start(), "inverted span: {span:?}");
                    self.entered += 1;
                }
                None => self.finished += 1,
            }
            true
        }
    }

    let source = "\
contract C is Base {
    uint256 x = 1 + 2 * 3;
    event E(uint256 indexed a);
    function f(uint256 y) public returns (uint256 z) {
        if (y > x) { z = y; } else z = x;
        (uint256 a,, uint256 b) = pair();
        return z + a + b;
    }
}
";
    let (unit, diagnostics) = parse("c.sol", source);
    assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
    let mut check = SpanCheck {
        entered: 0,
        finished: 0,
    };
    walk(&mut check, AstNode::SourceUnit(&unit));
    assert!(check.entered > 30);
    // Every accepted node gets exactly one finished signal.
    assert_eq!(check.entered, check.finished);
}

#[test]
fn declining_descent_prunes_the_subtree() {
    struct TopLevelOnly {
        decls: usize,
        below: usize,
    }

    impl Visitor for TopLevelOnly {
        fn visit(&mut self, node: Option<AstNode<'_>>) -> bool {
            match node {
                Some(AstNode::SourceUnit(_)) => true,
                Some(AstNode::Decl(_)) => {
                    self.decls += 1;
                    false
                }
                Some(_) => {
                    self.below += 1;
                    true
                }
                None => true,
            }
        }
    }

    let (unit, diagnostics) = parse("c.sol", "contract A { uint256 x; }\ncontract B { }\n");
    assert!(diagnostics.is_empty());
    let mut visitor = TopLevelOnly { decls: 0, below: 0 };
    walk(&mut visitor, AstNode::SourceUnit(&unit));
    assert_eq!(visitor.decls, 2);
    assert_eq!(visitor.below, 0);
}

#[test]
fn comments_never_reach_the_tree() {
    let source = "// header\ncontract C { /* body */ uint256 x; }\n";
    let (unit, diagnostics) = parse("c.sol", source);
    assert!(diagnostics.is_empty());
    assert_matches!(&unit.decls[0], Decl::Contract(contract) => {
        assert_eq!(contract.body.decls.len(), 1);
    });
}
