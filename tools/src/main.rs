use log::info;
use mugrammar::Grammar;
use rustyline::error::ReadlineError;

fn verdict(grammar: &mut Grammar, word: &str) -> String {
    if grammar.matches(word) {
        format!("{:?} is in the language", word)
    } else {
        format!("{:?} is NOT in the language", word)
    }
}

// Read lines until a mu-expression compiles. None on EOF/interrupt.
fn read_grammar(rl: &mut rustyline::DefaultEditor) -> Result<Option<Grammar>, String> {
    loop {
        match rl.readline("mu> ") {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
            Err(e) => return Err(format!("Readline err: {:?}", e)),
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match mugrammar::compile(line.trim()) {
                    Err(e) => println!("{}", e),
                    Ok(grammar) => {
                        print!("{}", grammar);
                        return Ok(Some(grammar));
                    }
                }
            }
        }
    }
}

fn repl() -> Result<(), String> {
    let mut rl = rustyline::DefaultEditor::new().map_err(|e| e.to_string())?;
    println!("Enter a mu-expression, eg: mu(x).xbx + a + #");
    let Some(mut grammar) = read_grammar(&mut rl)? else {
        return Ok(());
    };
    loop {
        match rl.readline("word> ") {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(format!("Readline err: {:?}", e)),
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match line.trim() {
                    ":grammar" => print!("{}", grammar),
                    ":new" => match read_grammar(&mut rl)? {
                        Some(next) => grammar = next,
                        None => return Ok(()),
                    },
                    "" => println!("{}", verdict(&mut grammar, "")),
                    words => for word in words.split_whitespace() {
                        println!("{}", verdict(&mut grammar, word));
                    },
                }
            }
        }
    }
}

fn main() -> Result<(), String> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    if let Some(expression) = args.next() {
        let mut grammar = mugrammar::compile(&expression).map_err(|e| e.to_string())?;
        print!("{}", grammar);
        for word in args {
            println!("{}", verdict(&mut grammar, &word));
        }
        info!("Done with {:?}", expression);
        return Ok(());
    }
    repl()
}
