use clap::{arg,crate_version,Command};
use huffpress::{huff,HuffmanCoder,SymbolReader};
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const RCH: &str = "unreachable was reached";

fn ok_to_overwrite(path_out: &str) -> bool {
    if let Ok(_f) = std::fs::File::open(path_out) {
        let mut ans = String::new();
        eprint!("{} exists, overwrite? (y/n) ",path_out);
        std::io::stdin().read_line(&mut ans).expect("could not read stdin");
        if ans.trim_end()=="y" || ans.trim_end()=="Y" {
            log::warn!("existing file will not be truncated");
            return true;
        }
        return false;
    }
    true
}

fn main() -> STDRESULT
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let long_help =
"Examples:
---------
Compress:      `huffpress compress -i my_expanded.txt -o my_compressed`
Expand:        `huffpress expand -i my_compressed -o my_expanded.txt`
Show codes:    `huffpress codes -i my_expanded.txt`";

    let mut main_cmd = Command::new("huffpress")
        .about("Compress and expand 7-bit text with static Huffman codes")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(Command::new("compress")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .about("compress a file"));

    main_cmd = main_cmd.subcommand(Command::new("expand")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .about("expand a file"));

    main_cmd = main_cmd.subcommand(Command::new("codes")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .about("print the code table of a file"));

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("compress") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        if !ok_to_overwrite(path_out) {
            eprintln!("abort operation");
            return Ok(());
        }
        let mut in_file = std::fs::File::open(path_in)?;
        let mut out_file = std::fs::OpenOptions::new().write(true).truncate(false).create(true).open(path_out)?;
        let (in_size,out_size) = huff::compress(&mut in_file,&mut out_file,&huffpress::STD_OPTIONS)?;
        out_file.set_len(out_size)?;
        eprintln!("compressed {} into {}",in_size,out_size);
    }

    if let Some(cmd) = matches.subcommand_matches("expand") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        if !ok_to_overwrite(path_out) {
            eprintln!("abort operation");
            return Ok(());
        }
        // decode fully before the output file is touched
        let compressed = std::fs::read(path_in)?;
        let expanded = huff::expand_slice(&compressed,&huffpress::STD_OPTIONS)?;
        std::fs::write(path_out,&expanded)?;
        eprintln!("expanded {} into {}",compressed.len(),expanded.len());
    }

    if let Some(cmd) = matches.subcommand_matches("codes") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let in_file = std::fs::File::open(path_in)?;
        let coder = HuffmanCoder::from_reader(&mut SymbolReader::new(in_file))?;
        if let Some(codes) = coder.codes() {
            for (symbol,code) in codes.entries() {
                println!("{} {}",std::ascii::escape_default(symbol),code);
            }
        }
    }

    Ok(())
}
