use std::io::Read;

use rstring::{Allocator, CountingAllocator, Error, String, ascii};

/// Waits until the user presses ENTER.
/// Handy when you want to watch the process with `pmap` or `gdb` between
/// steps, or just read the output one step at a time.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Prints content, length, capacity and the buffer address of `s`.
fn print_string<A: Allocator>(
  label: &str,
  s: &String<A>,
) {
  println!(
    "[{}] {:?} len = {}, cap = {}, buf = {:?}",
    label,
    s,
    s.len(),
    s.capacity(),
    s.as_ptr(),
  );
}

fn print_counters(allocator: &CountingAllocator) {
  println!(
    "    allocations = {}, reallocations = {}, deallocations = {}, failures = {}",
    allocator.allocations(),
    allocator.reallocations(),
    allocator.deallocations(),
    allocator.failures(),
  );
}

fn main() -> rstring::Result<()> {
  // Every request goes through the counting wrapper, so each step can show
  // how many times the underlying malloc/realloc/free were hit.
  let allocator = CountingAllocator::new();

  // --------------------------------------------------------------------
  // 1) An empty string owns no buffer at all.
  // --------------------------------------------------------------------
  let mut s = String::new_in(&allocator);
  println!("\n[1] New string");
  print_string("1", &s);
  print_counters(&allocator);

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) Push bytes one at a time and watch the capacity double.
  // --------------------------------------------------------------------
  println!("\n[2] Push 40 bytes one at a time");
  let mut last_cap = s.capacity();
  for byte in (b'a'..=b'z').chain(b'0'..=b'9').chain(*b"!?#$") {
    s.push(byte)?;
    if s.capacity() != last_cap {
      println!("[2] len = {:>2}: cap {} -> {}", s.len(), last_cap, s.capacity());
      last_cap = s.capacity();
    }
  }
  print_string("2", &s);
  print_counters(&allocator);

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) Insert and remove in the middle. The tail is shifted in place.
  // --------------------------------------------------------------------
  s.insert_str(26, b"___")?;
  println!("\n[3] Insert \"___\" at 26");
  print_string("3", &s);

  let removed = s.remove(0)?;
  let popped = s.pop()?;
  println!("[3] Removed {:?} from the front, popped {:?}", removed as char, popped as char);
  print_string("3", &s);

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) Retain with an ascii predicate, then split the string in two.
  // --------------------------------------------------------------------
  s.retain(ascii::is_alphanumeric);
  println!("\n[4] Retain alphanumeric bytes");
  print_string("4", &s);

  let digits = s.split_off(25)?;
  println!("[4] Split off at 25");
  print_string("4 head", &s);
  print_string("4 tail", &digits);
  print_counters(&allocator);

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 5) Give the spare capacity back.
  // --------------------------------------------------------------------
  s.shrink_to_fit()?;
  println!("\n[5] Shrink to fit");
  print_string("5", &s);

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 6) Make the allocator refuse. The string is left exactly as it was.
  // --------------------------------------------------------------------
  allocator.set_failing(true);
  let result = s.push_str(b"this will not fit");
  allocator.set_failing(false);

  println!("\n[6] Push with a failing allocator: {:?}", result);
  assert_eq!(result, Err(Error::MemAllocFailed));
  print_string("6", &s);
  print_counters(&allocator);

  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 7) Drop everything. Every block handed out has been released.
  // --------------------------------------------------------------------
  drop(s);
  drop(digits);
  println!("\n[7] Dropped both strings, live blocks = {}", allocator.live());
  print_counters(&allocator);

  Ok(())
}
